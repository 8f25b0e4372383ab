//! Output formats for report runs: terminal, Markdown and JSON.

use chatlens_core::analytics::{
    ranked, series, HourlyActivity, PauseDistribution, PeriodBucket, PeriodSeries, ReactionTally,
    ReplySummary, Report, ReportRun, SilenceSummary, WeeklyActivity,
};
use chatlens_core::format::{format_duration, format_percent};
use chatlens_core::ingest::format_timestamp;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// What was analysed, shown above the reports.
#[derive(Debug, Serialize)]
pub struct Overview {
    pub chat: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Messages left after filtering
    pub messages: usize,
    /// Records dropped while loading
    pub skipped: usize,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    #[serde(flatten)]
    overview: &'a Overview,
    reports: &'a [ReportRun],
}

// ============================================
// Terminal
// ============================================

pub fn print_terminal(out: &mut impl Write, overview: &Overview, runs: &[ReportRun]) -> io::Result<()> {
    let title = format!("{} - chat statistics", overview.chat);

    writeln!(out)?;
    writeln!(out, "╭{}╮", "─".repeat(60))?;
    writeln!(out, "│{:^60}│", title)?;
    writeln!(out, "╰{}╯", "─".repeat(60))?;
    if let (Some(start), Some(end)) = (overview.start, overview.end) {
        writeln!(out, "   Range:    {} to {}", start, end)?;
    }
    writeln!(out, "   Messages: {}", overview.messages)?;
    if overview.skipped > 0 {
        writeln!(out, "   Skipped:  {} malformed records", overview.skipped)?;
    }
    writeln!(out)?;

    for run in runs {
        writeln!(out, "{}", run.name.to_uppercase())?;
        match (&run.report, &run.error) {
            (Some(report), _) => terminal_report(out, report)?,
            (None, Some(error)) => writeln!(out, "   error: {}", error)?,
            (None, None) => writeln!(out, "   (no output)")?,
        }
        writeln!(out)?;
    }

    Ok(())
}

fn terminal_report(out: &mut impl Write, report: &Report) -> io::Result<()> {
    match report {
        Report::Messages(counts) => {
            let total: u64 = counts.values().sum();
            for (i, (sender, count)) in ranked(counts).into_iter().enumerate() {
                writeln!(
                    out,
                    "   {:>2}. {:<24} {:>7}  {}",
                    i + 1,
                    sender,
                    count,
                    format_percent(share(count, total))
                )?;
            }
        }
        Report::Activity(buckets) => {
            for bucket in buckets {
                writeln!(
                    out,
                    "   {}  {:>6} msgs  {:>7} words  {}",
                    bucket.start.date(),
                    bucket.total_messages(),
                    bucket.total_words(),
                    top_sender(bucket).unwrap_or("-")
                )?;
            }
            let series = series(buckets);
            if !series.messages.is_empty() {
                writeln!(out)?;
                terminal_grid(out, &period_labels(&series), &period_rows(&series))?;
            }
        }
        Report::Hourly(hourly) => {
            for sender in hourly.counts.keys() {
                let peak = hourly
                    .peak_hour(sender)
                    .map_or_else(|| "-".to_string(), |h| format!("{:02}:00", h));
                writeln!(
                    out,
                    "   {:<24} peak {}  total {}",
                    sender,
                    peak,
                    hourly.total(sender)
                )?;
            }
            terminal_grid(out, &hour_labels(hourly), &hourly_rows(hourly))?;
        }
        Report::Weekly(weekly) => {
            for sender in weekly.counts.keys() {
                writeln!(
                    out,
                    "   {:<24} busiest {}",
                    sender,
                    weekly.peak_day(sender).unwrap_or("-")
                )?;
            }
            terminal_grid(out, &weekly_labels(weekly), &weekly_rows(weekly))?;
        }
        Report::Silence(silence) => {
            if silence.gaps.is_empty() {
                writeln!(
                    out,
                    "   No silences of {} or more",
                    format_duration(silence.threshold_secs)
                )?;
            }
            for gap in &silence.gaps {
                writeln!(
                    out,
                    "   {:>8}  {} → {}",
                    gap.duration_display(),
                    format_timestamp(&gap.from),
                    format_timestamp(&gap.to)
                )?;
            }
        }
        Report::Pauses(pauses) => {
            if pauses.is_empty() {
                writeln!(out, "   Not enough messages to measure pauses")?;
            } else {
                terminal_grid(out, &pause_labels(pauses), &pause_rows(pauses))?;
            }
        }
        Report::Reactions(tally) => {
            for (emoji, count) in tally.ranked_totals() {
                writeln!(out, "   {}  {}", emoji, count)?;
            }
            for user in tally.per_user.keys() {
                writeln!(out, "   {:<24} {}", user, top_emojis(tally, user))?;
            }
            if !tally.is_fully_attributed() {
                writeln!(
                    out,
                    "   ({} reactions have no known author)",
                    tally.unattributed
                )?;
            }
        }
        Report::Replies(replies) => {
            if replies.graph.is_empty() {
                writeln!(out, "   No replies between participants")?;
            }
            for (edge, width) in replies.graph.edges.iter().zip(&replies.widths) {
                writeln!(
                    out,
                    "   {} → {}  {} (width {:.1})",
                    edge.sender, edge.replied_to, edge.weight, width
                )?;
            }
        }
    }
    Ok(())
}

/// Rows of `label` then one column per sender.
fn terminal_grid(
    out: &mut impl Write,
    labels: &[String],
    rows: &BTreeMap<String, Vec<String>>,
) -> io::Result<()> {
    write!(out, "   {:>8}", "")?;
    for sender in rows.keys() {
        write!(out, " {:>12}", truncate(sender, 12))?;
    }
    writeln!(out)?;
    for (i, label) in labels.iter().enumerate() {
        write!(out, "   {:>8}", label)?;
        for cells in rows.values() {
            write!(out, " {:>12}", cells[i])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

// ============================================
// Markdown
// ============================================

pub fn print_markdown(out: &mut impl Write, overview: &Overview, runs: &[ReportRun]) -> io::Result<()> {
    writeln!(out, "# {}", overview.chat)?;
    writeln!(out)?;
    if let (Some(start), Some(end)) = (overview.start, overview.end) {
        writeln!(out, "- **Range:** {} to {}", start, end)?;
    }
    writeln!(out, "- **Messages:** {}", overview.messages)?;
    if overview.skipped > 0 {
        writeln!(out, "- **Skipped records:** {}", overview.skipped)?;
    }
    writeln!(out)?;

    for run in runs {
        writeln!(out, "## {}", title_case(&run.name))?;
        writeln!(out)?;
        match (&run.report, &run.error) {
            (Some(report), _) => markdown_report(out, report)?,
            (None, Some(error)) => writeln!(out, "*Failed: {}*", error)?,
            (None, None) => writeln!(out, "*No output*")?,
        }
        writeln!(out)?;
    }

    writeln!(out, "---")?;
    writeln!(out, "*Generated by chatlens*")?;
    Ok(())
}

fn markdown_report(out: &mut impl Write, report: &Report) -> io::Result<()> {
    match report {
        Report::Messages(counts) => {
            let total: u64 = counts.values().sum();
            writeln!(out, "| Participant | Messages | Share |")?;
            writeln!(out, "|-------------|----------|-------|")?;
            for (sender, count) in ranked(counts) {
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    sender,
                    count,
                    format_percent(share(count, total))
                )?;
            }
        }
        Report::Activity(buckets) => markdown_activity(out, buckets)?,
        Report::Hourly(hourly) => {
            markdown_grid(out, "Hour", &hour_labels(hourly), &hourly_rows(hourly))?
        }
        Report::Weekly(weekly) => {
            markdown_grid(out, "Day", &weekly_labels(weekly), &weekly_rows(weekly))?
        }
        Report::Silence(silence) => markdown_silence(out, silence)?,
        Report::Pauses(pauses) => {
            if pauses.is_empty() {
                writeln!(out, "*Not enough messages to measure pauses*")?;
            } else {
                markdown_grid(out, "Pause", &pause_labels(pauses), &pause_rows(pauses))?;
            }
        }
        Report::Reactions(tally) => markdown_reactions(out, tally)?,
        Report::Replies(replies) => markdown_replies(out, replies)?,
    }
    Ok(())
}

fn markdown_activity(out: &mut impl Write, buckets: &[PeriodBucket]) -> io::Result<()> {
    writeln!(out, "| Period start | Messages | Words | Most active |")?;
    writeln!(out, "|--------------|----------|-------|-------------|")?;
    for bucket in buckets {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            bucket.start.date(),
            bucket.total_messages(),
            bucket.total_words(),
            top_sender(bucket).unwrap_or("-")
        )?;
    }

    let series = series(buckets);
    if !series.messages.is_empty() {
        writeln!(out)?;
        markdown_grid(out, "Period", &period_labels(&series), &period_rows(&series))?;
    }
    Ok(())
}

fn markdown_silence(out: &mut impl Write, silence: &SilenceSummary) -> io::Result<()> {
    if silence.gaps.is_empty() {
        writeln!(
            out,
            "*No silences of {} or more*",
            format_duration(silence.threshold_secs)
        )?;
        return Ok(());
    }
    writeln!(out, "| Duration | From | To |")?;
    writeln!(out, "|----------|------|----|")?;
    for gap in &silence.gaps {
        writeln!(
            out,
            "| {} | {} | {} |",
            gap.duration_display(),
            format_timestamp(&gap.from),
            format_timestamp(&gap.to)
        )?;
    }
    Ok(())
}

fn markdown_reactions(out: &mut impl Write, tally: &ReactionTally) -> io::Result<()> {
    writeln!(out, "| Reaction | Count |")?;
    writeln!(out, "|----------|-------|")?;
    for (emoji, count) in tally.ranked_totals() {
        writeln!(out, "| {} | {} |", emoji, count)?;
    }
    writeln!(out)?;

    if !tally.per_user.is_empty() {
        writeln!(out, "| Participant | Top reactions |")?;
        writeln!(out, "|-------------|---------------|")?;
        for user in tally.per_user.keys() {
            writeln!(out, "| {} | {} |", user, top_emojis(tally, user))?;
        }
        writeln!(out)?;
    }

    if !tally.is_fully_attributed() {
        writeln!(
            out,
            "*{} reactions have no known author*",
            tally.unattributed
        )?;
    }
    Ok(())
}

fn markdown_replies(out: &mut impl Write, replies: &ReplySummary) -> io::Result<()> {
    if replies.graph.is_empty() {
        writeln!(out, "*No replies between participants*")?;
        return Ok(());
    }
    writeln!(out, "| From | Replied to | Replies | Width |")?;
    writeln!(out, "|------|------------|---------|-------|")?;
    for (edge, width) in replies.graph.edges.iter().zip(&replies.widths) {
        writeln!(
            out,
            "| {} | {} | {} | {:.1} |",
            edge.sender, edge.replied_to, edge.weight, width
        )?;
    }
    Ok(())
}

fn markdown_grid(
    out: &mut impl Write,
    corner: &str,
    labels: &[String],
    rows: &BTreeMap<String, Vec<String>>,
) -> io::Result<()> {
    write!(out, "| {} |", corner)?;
    for sender in rows.keys() {
        write!(out, " {} |", sender)?;
    }
    writeln!(out)?;
    write!(out, "|---|")?;
    for _ in rows.keys() {
        write!(out, "---|")?;
    }
    writeln!(out)?;
    for (i, label) in labels.iter().enumerate() {
        write!(out, "| {} |", label)?;
        for cells in rows.values() {
            write!(out, " {} |", cells[i])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

// ============================================
// JSON
// ============================================

pub fn print_json(out: &mut impl Write, overview: &Overview, runs: &[ReportRun]) -> anyhow::Result<()> {
    let export = JsonExport {
        overview,
        reports: runs,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&export)?)?;
    Ok(())
}

// ============================================
// Shared helpers
// ============================================

fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn top_sender(bucket: &PeriodBucket) -> Option<&str> {
    bucket
        .counts
        .iter()
        .max_by(|a, b| a.1.messages.cmp(&b.1.messages).then_with(|| b.0.cmp(a.0)))
        .map(|(sender, _)| sender.as_str())
}

fn top_emojis(tally: &ReactionTally, user: &str) -> String {
    tally
        .top_for_user(user)
        .into_iter()
        .take(3)
        .map(|(emoji, count)| format!("{} {}", emoji, count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn period_labels(series: &PeriodSeries) -> Vec<String> {
    series.labels.iter().map(NaiveDate::to_string).collect()
}

/// Cells read "messages (words w)".
fn period_rows(series: &PeriodSeries) -> BTreeMap<String, Vec<String>> {
    series
        .messages
        .iter()
        .map(|(sender, messages)| {
            let words = series.words.get(sender).map(Vec::as_slice).unwrap_or(&[]);
            let cells = messages
                .iter()
                .zip(words)
                .map(|(m, w)| format!("{} ({}w)", m, w))
                .collect();
            (sender.clone(), cells)
        })
        .collect()
}

fn hour_labels(hourly: &HourlyActivity) -> Vec<String> {
    hourly.labels.iter().map(|h| format!("{:02}:00", h)).collect()
}

fn hourly_rows(hourly: &HourlyActivity) -> BTreeMap<String, Vec<String>> {
    hourly
        .counts
        .iter()
        .map(|(sender, counts)| (sender.clone(), counts.iter().map(u64::to_string).collect()))
        .collect()
}

fn weekly_labels(weekly: &WeeklyActivity) -> Vec<String> {
    weekly.labels.iter().map(|l| l.to_string()).collect()
}

fn weekly_rows(weekly: &WeeklyActivity) -> BTreeMap<String, Vec<String>> {
    weekly
        .counts
        .iter()
        .map(|(sender, counts)| (sender.clone(), counts.iter().map(u64::to_string).collect()))
        .collect()
}

fn pause_labels(pauses: &PauseDistribution) -> Vec<String> {
    pauses.labels().into_iter().map(str::to_string).collect()
}

fn pause_rows(pauses: &PauseDistribution) -> BTreeMap<String, Vec<String>> {
    pauses
        .senders
        .iter()
        .map(|(sender, stats)| {
            (
                sender.clone(),
                stats.percentages.iter().map(|p| format_percent(*p)).collect(),
            )
        })
        .collect()
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::analytics::{create_default_engine, ReportContext};
    use chatlens_core::ingest::{normalize_chat, parse_chat};

    const CHAT: &str = r#"{
        "name": "Book club",
        "messages": [
            {"id": 1, "from": "Ann", "date": "2024-01-01T10:00:00", "text": "hello there",
             "reactions": [{"type": "emoji", "emoji": "👍", "count": 2,
                            "recent": [{"from": "Bob"}]}]},
            {"id": 2, "from": "Bob", "date": "2024-01-01T10:05:00", "text": "hi", "reply_to_message_id": 1},
            {"id": 3, "from": "Ann", "date": "2024-01-03T09:00:00", "text": "anyone?"}
        ]
    }"#;

    fn render(f: fn(&mut Vec<u8>, &Overview, &[ReportRun]) -> io::Result<()>) -> String {
        let parsed = parse_chat(CHAT).unwrap();
        let messages = normalize_chat(&parsed.chat);
        let runs = create_default_engine().run_all(&messages, &ReportContext::default());
        let overview = Overview {
            chat: parsed.chat.display_name().to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1),
            end: NaiveDate::from_ymd_opt(2024, 1, 3),
            messages: messages.len(),
            skipped: 0,
        };
        let mut out = Vec::new();
        f(&mut out, &overview, &runs).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_terminal_lists_every_report() {
        let text = render(|out, o, r| print_terminal(out, o, r));
        for name in ["MESSAGES", "ACTIVITY", "HOURLY", "WEEKLY", "SILENCE", "PAUSES"] {
            assert!(text.contains(name), "missing {name} in:\n{text}");
        }
        assert!(text.contains("Book club"));
        assert!(text.contains("46h 55m"));
        assert!(text.contains("Bob → Ann"));
    }

    #[test]
    fn test_activity_breaks_down_per_participant() {
        let text = render(|out, o, r| print_markdown(out, o, r));
        assert!(text.contains("| Period | Ann | Bob |"), "no per-sender grid in:\n{text}");
        assert!(text.contains("| 2024-01-01 |"));
        assert!(text.contains(" 1 (1w) |"));

        let text = render(|out, o, r| print_terminal(out, o, r));
        assert!(text.contains("1 (1w)"));
    }

    #[test]
    fn test_markdown_tables() {
        let text = render(|out, o, r| print_markdown(out, o, r));
        assert!(text.starts_with("# Book club"));
        assert!(text.contains("| Participant | Messages | Share |"));
        assert!(text.contains("| Ann | 2 | 66.7% |"));
        assert!(text.contains("| Bob | Ann | 1 | 2.0 |"));
        assert!(text.contains("*1 reactions have no known author*"));
    }

    #[test]
    fn test_truncate_and_title_case() {
        assert_eq!(truncate("Alexandra Longname", 6), "Alexa…");
        assert_eq!(truncate("Ann", 6), "Ann");
        assert_eq!(title_case("replies"), "Replies");
    }
}
