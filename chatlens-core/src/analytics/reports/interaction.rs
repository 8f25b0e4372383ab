//! Interaction reports: silences, pauses, reactions and replies.

use crate::analytics::engine::{ChatReport, Report, ReplySummary, ReportContext, SilenceSummary};
use crate::analytics::filter::participants;
use crate::analytics::gaps::{pause_distribution, silence_periods};
use crate::analytics::reactions::tally_reactions;
use crate::analytics::replies::build_reply_graph;
use crate::error::{Error, Result};
use crate::ingest::NormalizedMessage;
use std::collections::BTreeSet;

/// Chat-wide silences above the configured threshold.
pub struct SilenceReport;

impl ChatReport for SilenceReport {
    fn name(&self) -> &str {
        "silence"
    }

    fn description(&self) -> &str {
        "Longest periods with no messages at all"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report> {
        if ctx.silence_threshold_secs <= 0 {
            return Err(Error::InvalidOption(format!(
                "silence threshold must be positive, got {}s",
                ctx.silence_threshold_secs
            )));
        }
        Ok(Report::Silence(SilenceSummary {
            threshold_secs: ctx.silence_threshold_secs,
            gaps: silence_periods(messages, ctx.silence_threshold_secs),
        }))
    }
}

/// How long each sender waits between their own messages.
pub struct PausesReport;

impl ChatReport for PausesReport {
    fn name(&self) -> &str {
        "pauses"
    }

    fn description(&self) -> &str {
        "Distribution of pauses between a participant's messages"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report> {
        Ok(Report::Pauses(pause_distribution(
            messages,
            ctx.min_display_percent,
        )))
    }
}

/// Emoji reaction totals and per-user usage.
pub struct ReactionsReport;

impl ChatReport for ReactionsReport {
    fn name(&self) -> &str {
        "reactions"
    }

    fn description(&self) -> &str {
        "Reaction totals and who reacted with what"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], _ctx: &ReportContext) -> Result<Report> {
        Ok(Report::Reactions(tally_reactions(messages)))
    }
}

/// Who replies to whom.
pub struct RepliesReport;

impl ChatReport for RepliesReport {
    fn name(&self) -> &str {
        "replies"
    }

    fn description(&self) -> &str {
        "Reply network between participants"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report> {
        let selection: BTreeSet<String> = match &ctx.participants {
            Some(selected) => selected.clone(),
            None => participants(messages).into_iter().collect(),
        };
        let graph = build_reply_graph(messages, &selection);
        let widths = graph.display_widths(ctx.edge_scale);
        Ok(Report::Replies(ReplySummary { graph, widths }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize_messages;
    use crate::types::Message;

    fn message(id: i64, from: &str, date: &str, reply_to: Option<i64>) -> Message {
        Message {
            id: Some(id),
            from: Some(from.to_string()),
            date: Some(date.to_string()),
            reply_to_message_id: reply_to,
            ..Default::default()
        }
    }

    #[test]
    fn test_silence_carries_threshold() {
        let messages = vec![
            message(1, "Ann", "2024-01-01T00:00:00", None),
            message(2, "Bob", "2024-01-01T10:00:00", None),
            message(3, "Ann", "2024-01-02T17:00:00", None),
        ];
        let normalized = normalize_messages(&messages);
        let Report::Silence(report) = SilenceReport
            .run(&normalized, &ReportContext::default())
            .unwrap()
        else {
            panic!("expected silence report");
        };
        assert_eq!(report.threshold_secs, 30 * 3600);
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].duration_secs, 31 * 3600);
    }

    #[test]
    fn test_silence_rejects_non_positive_threshold() {
        let ctx = ReportContext {
            silence_threshold_secs: 0,
            ..Default::default()
        };
        assert!(SilenceReport.run(&[], &ctx).is_err());
    }

    #[test]
    fn test_replies_default_to_everyone() {
        let messages = vec![
            message(1, "Bob", "2024-01-01T10:00:00", None),
            message(2, "Ann", "2024-01-01T10:01:00", Some(1)),
        ];
        let normalized = normalize_messages(&messages);
        let Report::Replies(report) = RepliesReport
            .run(&normalized, &ReportContext::default())
            .unwrap()
        else {
            panic!("expected replies report");
        };
        assert_eq!(report.graph.participants, vec!["Ann", "Bob"]);
        assert_eq!(report.graph.weight("Ann", "Bob"), 1);
        assert_eq!(report.widths, vec![2.0]);
    }

    #[test]
    fn test_replies_honour_selection() {
        let messages = vec![
            message(1, "Bob", "2024-01-01T10:00:00", None),
            message(2, "Ann", "2024-01-01T10:01:00", Some(1)),
        ];
        let normalized = normalize_messages(&messages);
        let ctx = ReportContext {
            participants: Some(["Ann".to_string()].into_iter().collect()),
            ..Default::default()
        };
        let Report::Replies(report) = RepliesReport.run(&normalized, &ctx).unwrap() else {
            panic!("expected replies report");
        };
        assert!(report.graph.is_empty());
        assert!(report.widths.is_empty());
    }
}
