//! Per-sender message totals.

use crate::ingest::{usable, NormalizedMessage};
use std::collections::BTreeMap;

/// Count usable messages per sender.
pub fn count_messages(messages: &[NormalizedMessage<'_>]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for (_, sender, _) in usable(messages) {
        *counts.entry(sender.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Senders ordered by message count (descending), ties by name.
pub fn ranked(counts: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut ranked: Vec<_> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}
