//! Hour-of-day and day-of-week activity histograms.

use crate::error::{Error, Result};
use crate::ingest::{usable, NormalizedMessage};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hour at which the activity "day" begins by default.
pub const DEFAULT_ORIGIN_HOUR: u32 = 4;

/// Weekday bucket labels, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Per-sender message counts by shifted hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyActivity {
    /// Hour treated as the start of the day
    pub origin_hour: u32,
    /// Clock hour shown for each bucket index
    pub labels: Vec<u32>,
    /// sender -> counts indexed by shifted hour
    pub counts: BTreeMap<String, [u64; 24]>,
}

impl HourlyActivity {
    /// Shifted bucket index of a clock hour.
    pub fn bucket(&self, hour: u32) -> usize {
        ((hour % 24 + 24 - self.origin_hour % 24) % 24) as usize
    }

    /// Total messages for a sender.
    pub fn total(&self, sender: &str) -> u64 {
        self.counts.get(sender).map_or(0, |c| c.iter().sum())
    }

    /// Busiest clock hour for a sender.
    pub fn peak_hour(&self, sender: &str) -> Option<u32> {
        let counts = self.counts.get(sender)?;
        peak_index(counts).map(|i| self.labels[i])
    }
}

/// Bucket messages by hour of day, relabelled so `origin_hour` comes first.
///
/// `origin_hour` must be below 24.
pub fn hourly_activity(
    messages: &[NormalizedMessage<'_>],
    origin_hour: u32,
) -> Result<HourlyActivity> {
    if origin_hour >= 24 {
        return Err(Error::InvalidOption(format!(
            "origin hour must be between 0 and 23, got {}",
            origin_hour
        )));
    }

    let mut activity = HourlyActivity {
        origin_hour,
        labels: (0..24).map(|i| (i + origin_hour) % 24).collect(),
        counts: BTreeMap::new(),
    };

    for (_, sender, instant) in usable(messages) {
        let bucket = activity.bucket(instant.hour());
        activity
            .counts
            .entry(sender.to_string())
            .or_insert([0; 24])[bucket] += 1;
    }

    Ok(activity)
}

/// How messages are assigned to the seven weekly buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayMode {
    /// Day of month modulo seven, not the real weekday.
    #[default]
    DayOfMonth,
    /// Actual weekday, Monday = 0.
    Weekday,
}

impl WeekdayMode {
    /// Bucket index of an instant.
    pub fn bucket(&self, instant: NaiveDateTime) -> usize {
        match self {
            WeekdayMode::DayOfMonth => (instant.day() % 7) as usize,
            WeekdayMode::Weekday => instant.weekday().num_days_from_monday() as usize,
        }
    }
}

/// Per-sender message counts over seven weekly buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyActivity {
    pub mode: WeekdayMode,
    pub labels: Vec<&'static str>,
    /// sender -> counts per bucket
    pub counts: BTreeMap<String, [u64; 7]>,
}

impl WeeklyActivity {
    /// Busiest bucket label for a sender.
    pub fn peak_day(&self, sender: &str) -> Option<&'static str> {
        let counts = self.counts.get(sender)?;
        peak_index(counts).map(|i| self.labels[i])
    }
}

/// Bucket messages into seven weekly slots.
pub fn weekly_activity(messages: &[NormalizedMessage<'_>], mode: WeekdayMode) -> WeeklyActivity {
    let mut activity = WeeklyActivity {
        mode,
        labels: WEEKDAY_LABELS.to_vec(),
        counts: BTreeMap::new(),
    };

    for (_, sender, instant) in usable(messages) {
        activity
            .counts
            .entry(sender.to_string())
            .or_insert([0; 7])[mode.bucket(instant)] += 1;
    }

    activity
}

/// Index of the largest non-zero count; earliest index wins ties.
fn peak_index(counts: &[u64]) -> Option<usize> {
    counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .fold(None, |best: Option<(usize, u64)>, (i, &c)| match best {
            Some((_, top)) if top >= c => best,
            _ => Some((i, c)),
        })
        .map(|(i, _)| i)
}
