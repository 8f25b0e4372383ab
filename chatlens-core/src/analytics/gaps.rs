//! Time gaps between consecutive messages.
//!
//! Two analyses share the same primitive (sort by instant, take deltas):
//! - chat-wide silences longer than a threshold
//! - each sender's distribution of pauses between their own messages,
//!   binned by powers of two seconds

use crate::format::{format_compact_secs, format_duration};
use crate::ingest::{usable, NormalizedMessage};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default silence threshold: 30 hours.
pub const DEFAULT_SILENCE_THRESHOLD_SECS: i64 = 30 * 3600;

/// Default display clamp for pause percentages.
pub const DEFAULT_MIN_DISPLAY_PERCENT: f64 = 1.0;

/// A span between two chronologically adjacent messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    /// Instant of the earlier message
    pub from: NaiveDateTime,
    /// Instant of the later message
    pub to: NaiveDateTime,
    /// Length in seconds (never negative)
    pub duration_secs: i64,
    /// Human-readable length (e.g., "31h 5m")
    pub duration: String,
}

impl Gap {
    fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        let duration_secs = to.signed_duration_since(from).num_seconds();
        Self {
            from,
            to,
            duration_secs,
            duration: format_duration(duration_secs),
        }
    }

    /// Human-readable duration (e.g., "31h 5m").
    pub fn duration_display(&self) -> &str {
        &self.duration
    }
}

/// Sorted instants of all usable messages, regardless of sender.
fn sorted_instants(messages: &[NormalizedMessage<'_>]) -> Vec<NaiveDateTime> {
    let mut instants: Vec<_> = usable(messages).map(|(_, _, instant)| instant).collect();
    instants.sort();
    instants
}

/// Seconds between consecutive instants. Input must be sorted.
fn consecutive_deltas(instants: &[NaiveDateTime]) -> impl Iterator<Item = i64> + '_ {
    instants
        .windows(2)
        .map(|pair| pair[1].signed_duration_since(pair[0]).num_seconds())
}

/// Chat-wide silences of at least `threshold_secs`, longest first.
///
/// Equal durations keep chronological order.
pub fn silence_periods(messages: &[NormalizedMessage<'_>], threshold_secs: i64) -> Vec<Gap> {
    let instants = sorted_instants(messages);
    let mut gaps: Vec<Gap> = instants
        .windows(2)
        .filter(|pair| pair[1].signed_duration_since(pair[0]).num_seconds() >= threshold_secs)
        .map(|pair| Gap::new(pair[0], pair[1]))
        .collect();
    gaps.sort_by(|a, b| b.duration_secs.cmp(&a.duration_secs));

    tracing::debug!(
        messages = instants.len(),
        silences = gaps.len(),
        threshold_secs,
        "Detected silence periods"
    );

    gaps
}

/// One power-of-two duration bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PauseBin {
    /// Lower edge in seconds (inclusive)
    pub lower_secs: u64,
    /// Upper edge in seconds (exclusive, except for the last bin)
    pub upper_secs: u64,
    /// Display label (e.g., "1m–2m")
    pub label: String,
}

/// Pause statistics for one sender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderPauses {
    /// Raw gap count per bin
    pub counts: Vec<u64>,
    /// Total number of gaps
    pub total: u64,
    /// Share of gaps per bin; shares under the display clamp read as 0
    pub percentages: Vec<f64>,
}

/// Per-sender pause distribution over shared bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PauseDistribution {
    pub bins: Vec<PauseBin>,
    /// Percentages below this are shown as zero
    pub min_display_percent: f64,
    /// Senders with at least one positive gap
    pub senders: BTreeMap<String, SenderPauses>,
}

impl PauseDistribution {
    /// Bin labels in order.
    pub fn labels(&self) -> Vec<&str> {
        self.bins.iter().map(|b| b.label.as_str()).collect()
    }

    /// True when no sender has a measurable pause.
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

fn floor_log2(n: u64) -> u32 {
    63 - n.leading_zeros()
}

fn ceil_log2(n: u64) -> u32 {
    if n.is_power_of_two() {
        n.trailing_zeros()
    } else {
        64 - n.leading_zeros()
    }
}

/// Distribution of each sender's pauses between their own messages.
///
/// Bins are `[2^i, 2^(i+1))` seconds for `i` in `0..ceil(log2(max_gap))`,
/// shared across senders; the last bin also holds gaps equal to its upper
/// edge. Zero-length gaps (duplicate timestamps) are ignored.
pub fn pause_distribution(
    messages: &[NormalizedMessage<'_>],
    min_display_percent: f64,
) -> PauseDistribution {
    let mut per_sender: BTreeMap<&str, Vec<NaiveDateTime>> = BTreeMap::new();
    for (_, sender, instant) in usable(messages) {
        per_sender.entry(sender).or_default().push(instant);
    }

    let mut sender_gaps: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for (sender, mut instants) in per_sender {
        instants.sort();
        let gaps: Vec<u64> = consecutive_deltas(&instants)
            .filter(|&secs| secs > 0)
            .map(|secs| secs as u64)
            .collect();
        if !gaps.is_empty() {
            sender_gaps.insert(sender, gaps);
        }
    }

    let Some(max_gap) = sender_gaps.values().flatten().copied().max() else {
        return PauseDistribution {
            bins: Vec::new(),
            min_display_percent,
            senders: BTreeMap::new(),
        };
    };

    let bin_count = ceil_log2(max_gap).max(1) as usize;
    let bins: Vec<PauseBin> = (0..bin_count)
        .map(|i| {
            let lower_secs = 1u64 << i;
            let upper_secs = lower_secs << 1;
            PauseBin {
                lower_secs,
                upper_secs,
                label: format!(
                    "{}–{}",
                    format_compact_secs(lower_secs),
                    format_compact_secs(upper_secs)
                ),
            }
        })
        .collect();

    let senders = sender_gaps
        .into_iter()
        .map(|(sender, gaps)| {
            let mut counts = vec![0u64; bin_count];
            for gap in &gaps {
                let index = (floor_log2(*gap) as usize).min(bin_count - 1);
                counts[index] += 1;
            }
            let total = gaps.len() as u64;
            let percentages = counts
                .iter()
                .map(|&count| {
                    let share = count as f64 / total as f64 * 100.0;
                    if share < min_display_percent {
                        0.0
                    } else {
                        share
                    }
                })
                .collect();
            (
                sender.to_string(),
                SenderPauses {
                    counts,
                    total,
                    percentages,
                },
            )
        })
        .collect();

    PauseDistribution {
        bins,
        min_display_percent,
        senders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{format_timestamp, normalize_messages, parse_timestamp};
    use crate::types::Message;
    use chrono::Duration;

    fn message(from: &str, date: &str) -> Message {
        Message {
            from: Some(from.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    /// Messages from `sender` at `base + offset` seconds for each offset.
    fn at_offsets(sender: &str, offsets: &[i64]) -> Vec<Message> {
        let base = parse_timestamp("2024-01-01T00:00:00").unwrap();
        offsets
            .iter()
            .map(|&o| message(sender, &format_timestamp(&(base + Duration::seconds(o)))))
            .collect()
    }

    #[test]
    fn test_single_long_silence() {
        let hour = 3600;
        let messages = at_offsets("Ann", &[0, 10 * hour, 41 * hour]);
        let normalized = normalize_messages(&messages);
        let gaps = silence_periods(&normalized, DEFAULT_SILENCE_THRESHOLD_SECS);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].duration_secs, 31 * hour);
        assert_eq!(gaps[0].duration_display(), "31h");
    }

    #[test]
    fn test_serialized_silence_carries_readable_duration() {
        let hour = 3600;
        let messages = at_offsets("Ann", &[0, 42 * hour + 20 * 60]);
        let normalized = normalize_messages(&messages);
        let gaps = silence_periods(&normalized, DEFAULT_SILENCE_THRESHOLD_SECS);
        let json = serde_json::to_value(&gaps[0]).unwrap();
        assert_eq!(json["duration"], "42h 20m");
        assert_eq!(json["duration_secs"], 42 * hour + 20 * 60);
        assert_eq!(json["from"], "2024-01-01T00:00:00");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let messages = at_offsets("Ann", &[0, DEFAULT_SILENCE_THRESHOLD_SECS]);
        let normalized = normalize_messages(&messages);
        assert_eq!(
            silence_periods(&normalized, DEFAULT_SILENCE_THRESHOLD_SECS).len(),
            1
        );
    }

    #[test]
    fn test_silences_longest_first_across_senders() {
        let hour = 3600;
        let mut messages = at_offsets("Ann", &[100 * hour, 0]);
        messages.extend(at_offsets("Bob", &[40 * hour]));
        let normalized = normalize_messages(&messages);
        let gaps = silence_periods(&normalized, DEFAULT_SILENCE_THRESHOLD_SECS);
        let durations: Vec<_> = gaps.iter().map(|g| g.duration_secs / hour).collect();
        assert_eq!(durations, vec![60, 40]);
        assert!(gaps.iter().all(|g| g.from < g.to));
    }

    #[test]
    fn test_silence_needs_two_messages() {
        let messages = at_offsets("Ann", &[0]);
        let normalized = normalize_messages(&messages);
        assert!(silence_periods(&normalized, 1).is_empty());
        assert!(silence_periods(&[], 1).is_empty());
    }

    #[test]
    fn test_pause_distribution_shares() {
        let messages = at_offsets("Ann", &[0, 1, 2, 102, 202, 302]);
        let normalized = normalize_messages(&messages);
        let dist = pause_distribution(&normalized, DEFAULT_MIN_DISPLAY_PERCENT);

        assert_eq!(dist.bins.len(), 7);
        assert_eq!(dist.bins[0].label, "1s–2s");
        assert_eq!(dist.bins[6].lower_secs, 64);

        let ann = &dist.senders["Ann"];
        assert_eq!(ann.total, 5);
        assert_eq!(ann.counts[0], 2);
        assert_eq!(ann.counts[6], 3);
        assert!((ann.percentages[0] - 40.0).abs() < 1e-9);
        assert!((ann.percentages[6] - 60.0).abs() < 1e-9);
        assert_eq!(ann.percentages[1..6], [0.0; 5]);
    }

    #[test]
    fn test_small_shares_display_as_zero() {
        // 1 gap of 1s and 199 gaps of 3s: the 1s bin holds 0.5%
        let mut offsets = vec![0, 1];
        for i in 1..=199 {
            offsets.push(1 + 3 * i);
        }
        let messages = at_offsets("Ann", &offsets);
        let normalized = normalize_messages(&messages);
        let dist = pause_distribution(&normalized, DEFAULT_MIN_DISPLAY_PERCENT);
        let ann = &dist.senders["Ann"];
        assert_eq!(ann.counts[0], 1);
        assert_eq!(ann.percentages[0], 0.0);
        assert!((ann.percentages[1] - 99.5).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_timestamps_ignored() {
        let messages = at_offsets("Ann", &[0, 0, 0, 8]);
        let normalized = normalize_messages(&messages);
        let dist = pause_distribution(&normalized, DEFAULT_MIN_DISPLAY_PERCENT);
        let ann = &dist.senders["Ann"];
        assert_eq!(ann.total, 1);
        // 8s equals the top edge of the last bin [4, 8]
        assert_eq!(dist.bins.len(), 3);
        assert_eq!(ann.counts, vec![0, 0, 1]);
    }

    #[test]
    fn test_bins_shared_between_senders() {
        let mut messages = at_offsets("Ann", &[0, 1]);
        messages.extend(at_offsets("Bob", &[0, 1000]));
        let normalized = normalize_messages(&messages);
        let dist = pause_distribution(&normalized, DEFAULT_MIN_DISPLAY_PERCENT);
        assert_eq!(dist.bins.len(), 10);
        assert_eq!(dist.senders["Ann"].counts.len(), 10);
        assert_eq!(dist.senders["Bob"].counts[9], 1);
    }

    #[test]
    fn test_one_second_maximum_has_one_bin() {
        let messages = at_offsets("Ann", &[0, 1, 2]);
        let normalized = normalize_messages(&messages);
        let dist = pause_distribution(&normalized, DEFAULT_MIN_DISPLAY_PERCENT);
        assert_eq!(dist.bins.len(), 1);
        assert_eq!(dist.senders["Ann"].counts, vec![2]);
    }

    #[test]
    fn test_no_gaps_is_empty() {
        let messages = at_offsets("Ann", &[0]);
        let normalized = normalize_messages(&messages);
        let dist = pause_distribution(&normalized, DEFAULT_MIN_DISPLAY_PERCENT);
        assert!(dist.is_empty());
        assert!(dist.bins.is_empty());
    }

    #[test]
    fn test_log2_helpers() {
        assert_eq!(floor_log2(1), 0);
        assert_eq!(floor_log2(100), 6);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2(100), 7);
    }
}
