//! Activity over fixed-length calendar periods.
//!
//! The selected day range is split into consecutive windows of
//! `period_days` days starting at midnight of the first day. Each window is
//! half-open (`[start, end)`), so a message exactly on a boundary belongs
//! to the later window. The final window may extend past the end day, but
//! only messages within the selected days are counted.

use super::words::message_word_count;
use crate::error::{Error, Result};
use crate::ingest::{usable, NormalizedMessage};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Window length used when none is configured.
pub const DEFAULT_PERIOD_DAYS: u32 = 20;

/// Messages and words sent by one sender within a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SenderTally {
    pub messages: u64,
    pub words: u64,
}

/// Tallies for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    /// Window start (inclusive)
    pub start: NaiveDateTime,
    /// Window end (exclusive)
    pub end: NaiveDateTime,
    /// Per-sender tallies; senders without messages are absent
    pub counts: BTreeMap<String, SenderTally>,
}

impl PeriodBucket {
    fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            counts: BTreeMap::new(),
        }
    }

    fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Messages in this window across all senders.
    pub fn total_messages(&self) -> u64 {
        self.counts.values().map(|t| t.messages).sum()
    }

    /// Words in this window across all senders.
    pub fn total_words(&self) -> u64 {
        self.counts.values().map(|t| t.words).sum()
    }
}

/// Per-sender series aligned with the bucket order, for charting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodSeries {
    /// Window start days
    pub labels: Vec<NaiveDate>,
    /// sender -> message count per window
    pub messages: BTreeMap<String, Vec<u64>>,
    /// sender -> word count per window
    pub words: BTreeMap<String, Vec<u64>>,
}

/// Tally messages and words per sender over consecutive windows.
///
/// Returns [`Error::InvalidRange`] when `start_day > end_day` and
/// [`Error::InvalidPeriod`] for a zero-day period.
pub fn aggregate_periods(
    messages: &[NormalizedMessage<'_>],
    start_day: NaiveDate,
    end_day: NaiveDate,
    period_days: u32,
) -> Result<Vec<PeriodBucket>> {
    if start_day > end_day {
        return Err(Error::InvalidRange {
            start: start_day,
            end: end_day,
        });
    }
    if period_days == 0 {
        return Err(Error::InvalidPeriod);
    }

    let step = Duration::days(i64::from(period_days));
    let mut buckets = Vec::new();
    let mut window_start = start_day.and_time(chrono::NaiveTime::MIN);
    while window_start.date() <= end_day {
        // Past the last representable instant the final window stays open-ended.
        let Some(window_end) = window_start.checked_add_signed(step) else {
            buckets.push(PeriodBucket::new(window_start, NaiveDateTime::MAX));
            break;
        };
        buckets.push(PeriodBucket::new(window_start, window_end));
        window_start = window_end;
    }

    let mut in_range: Vec<_> = usable(messages)
        .filter(|(_, _, instant)| {
            let day = instant.date();
            start_day <= day && day <= end_day
        })
        .collect();
    in_range.sort_by_key(|(_, _, instant)| *instant);

    // Both sides are chronological, so one forward pass assigns every message.
    let mut index = 0;
    for (message, sender, instant) in in_range {
        while index + 1 < buckets.len() && !buckets[index].contains(instant) {
            index += 1;
        }
        let tally = buckets[index]
            .counts
            .entry(sender.to_string())
            .or_default();
        tally.messages += 1;
        tally.words += message_word_count(message);
    }

    tracing::debug!(
        windows = buckets.len(),
        period_days,
        %start_day,
        %end_day,
        "Aggregated activity by period"
    );

    Ok(buckets)
}

/// Project buckets into zero-filled per-sender series.
pub fn series(buckets: &[PeriodBucket]) -> PeriodSeries {
    let senders: BTreeSet<&String> = buckets.iter().flat_map(|b| b.counts.keys()).collect();

    let mut out = PeriodSeries {
        labels: buckets.iter().map(|b| b.start.date()).collect(),
        ..Default::default()
    };
    for sender in senders {
        let tallies: Vec<SenderTally> = buckets
            .iter()
            .map(|b| b.counts.get(sender).copied().unwrap_or_default())
            .collect();
        out.messages
            .insert(sender.clone(), tallies.iter().map(|t| t.messages).collect());
        out.words
            .insert(sender.clone(), tallies.iter().map(|t| t.words).collect());
    }
    out
}
