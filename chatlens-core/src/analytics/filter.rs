//! Date-range and participant selection.

use crate::error::{Error, Result};
use crate::ingest::NormalizedMessage;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Selection applied before running reports.
///
/// Both date bounds are inclusive calendar days. `None` leaves that side
/// open; `participants: None` keeps every sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub participants: Option<BTreeSet<String>>,
}

impl MessageFilter {
    /// Filter on an inclusive day range.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            participants: None,
        }
    }

    /// Restrict to the given senders.
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    /// Reject a range whose start lies after its end.
    pub fn validate(&self) -> Result<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidRange { start, end }),
            _ => Ok(()),
        }
    }

    /// Whether a usable message falls inside this selection.
    pub fn matches(&self, message: &NormalizedMessage<'_>) -> bool {
        let (Some(sender), Some(day)) = (message.sender(), message.day()) else {
            return false;
        };
        if self.start.is_some_and(|start| day < start) {
            return false;
        }
        if self.end.is_some_and(|end| day > end) {
            return false;
        }
        match &self.participants {
            Some(selected) => selected.contains(sender),
            None => true,
        }
    }

    /// Keep the messages that match. Unusable messages are always dropped.
    pub fn apply<'a>(&self, messages: &[NormalizedMessage<'a>]) -> Result<Vec<NormalizedMessage<'a>>> {
        self.validate()?;
        let kept: Vec<_> = messages
            .iter()
            .filter(|m| self.matches(m))
            .copied()
            .collect();
        tracing::debug!(
            total = messages.len(),
            kept = kept.len(),
            start = ?self.start,
            end = ?self.end,
            "Applied message filter"
        );
        Ok(kept)
    }

    /// Fill open bounds from the data so callers can report the actual range.
    pub fn resolved_range(&self, messages: &[NormalizedMessage<'_>]) -> Option<(NaiveDate, NaiveDate)> {
        let (min, max) = date_bounds(messages)?;
        Some((self.start.unwrap_or(min), self.end.unwrap_or(max)))
    }
}

/// Earliest and latest calendar day among usable messages.
pub fn date_bounds(messages: &[NormalizedMessage<'_>]) -> Option<(NaiveDate, NaiveDate)> {
    messages
        .iter()
        .filter(|m| m.usable().is_some())
        .filter_map(|m| m.day())
        .fold(None, |bounds, day| match bounds {
            None => Some((day, day)),
            Some((min, max)) => Some((min.min(day), max.max(day))),
        })
}

/// Distinct senders of usable messages, sorted by name.
pub fn participants(messages: &[NormalizedMessage<'_>]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| m.usable().map(|(sender, _)| sender))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize_messages;
    use crate::types::Message;

    fn message(from: &str, date: &str) -> Message {
        Message {
            from: Some(from.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = MessageFilter::between(day(2024, 2, 1), day(2024, 1, 1));
        assert!(matches!(filter.validate(), Err(Error::InvalidRange { .. })));
        assert!(filter.apply(&[]).is_err());
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let filter = MessageFilter::between(day(2024, 1, 1), day(2024, 1, 1));
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_range_is_inclusive() {
        let messages = vec![
            message("Ann", "2023-12-31T23:59:59"),
            message("Ann", "2024-01-01T00:00:00"),
            message("Ann", "2024-01-31T23:59:59"),
            message("Ann", "2024-02-01T00:00:00"),
        ];
        let normalized = normalize_messages(&messages);
        let kept = MessageFilter::between(day(2024, 1, 1), day(2024, 1, 31))
            .apply(&normalized)
            .unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_participant_selection() {
        let messages = vec![
            message("Ann", "2024-01-01T00:00:00"),
            message("Bob", "2024-01-01T00:00:00"),
            message("Cid", "2024-01-01T00:00:00"),
        ];
        let normalized = normalize_messages(&messages);
        let kept = MessageFilter::default()
            .with_participants(["Ann", "Cid"])
            .apply(&normalized)
            .unwrap();
        let senders: Vec<_> = kept.iter().filter_map(|m| m.sender()).collect();
        assert_eq!(senders, vec!["Ann", "Cid"]);
    }

    #[test]
    fn test_unusable_messages_dropped() {
        let messages = vec![
            message("Ann", "bad"),
            Message {
                date: Some("2024-01-01T00:00:00".to_string()),
                ..Default::default()
            },
        ];
        let normalized = normalize_messages(&messages);
        assert!(MessageFilter::default().apply(&normalized).unwrap().is_empty());
    }

    #[test]
    fn test_date_bounds_and_participants() {
        let messages = vec![
            message("Bob", "2024-03-05T10:00:00"),
            message("Ann", "2024-01-02T10:00:00"),
            message("Ann", "garbage"),
        ];
        let normalized = normalize_messages(&messages);
        assert_eq!(
            date_bounds(&normalized),
            Some((day(2024, 1, 2), day(2024, 3, 5)))
        );
        assert_eq!(participants(&normalized), vec!["Ann", "Bob"]);
        assert_eq!(date_bounds(&[]), None);
    }

    #[test]
    fn test_resolved_range_fills_open_bounds() {
        let messages = vec![
            message("Ann", "2024-01-02T10:00:00"),
            message("Ann", "2024-03-05T10:00:00"),
        ];
        let normalized = normalize_messages(&messages);
        let filter = MessageFilter {
            start: Some(day(2024, 2, 1)),
            ..Default::default()
        };
        assert_eq!(
            filter.resolved_range(&normalized),
            Some((day(2024, 2, 1), day(2024, 3, 5)))
        );
    }
}
