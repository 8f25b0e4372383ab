//! Reaction tallies.
//!
//! The export stores a total `count` per reaction and a `recent` list of
//! some of the reactors. Global totals use `count`; per-user counts can
//! only use `recent`, so they are a lower bound. [`ReactionTally::unattributed`]
//! says how many reactions the per-user table is missing.

use super::counter::ranked;
use crate::ingest::{usable, NormalizedMessage};
use serde::Serialize;
use std::collections::BTreeMap;

/// Global and per-user reaction counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReactionTally {
    /// emoji -> total reactions (from `count`)
    pub totals: BTreeMap<String, u64>,
    /// user -> emoji -> reactions attributed to that user (from `recent`)
    pub per_user: BTreeMap<String, BTreeMap<String, u64>>,
    /// Reactions included in `totals` that no `recent` entry accounts for
    pub unattributed: u64,
}

impl ReactionTally {
    /// Whether `per_user` covers every counted reaction.
    pub fn is_fully_attributed(&self) -> bool {
        self.unattributed == 0
    }

    /// Emojis by total count, most used first; ties by emoji.
    pub fn ranked_totals(&self) -> Vec<(&str, u64)> {
        ranked(&self.totals)
    }

    /// A user's emojis, most used first.
    pub fn top_for_user(&self, user: &str) -> Vec<(&str, u64)> {
        self.per_user.get(user).map(ranked).unwrap_or_default()
    }

    /// Every emoji appearing in the per-user table, sorted.
    pub fn user_emojis(&self) -> Vec<&str> {
        let mut emojis: Vec<&str> = self
            .per_user
            .values()
            .flat_map(|m| m.keys().map(String::as_str))
            .collect();
        emojis.sort_unstable();
        emojis.dedup();
        emojis
    }
}

/// Tally reactions on usable messages.
///
/// Reactions without an emoji (custom stickers) are skipped.
pub fn tally_reactions(messages: &[NormalizedMessage<'_>]) -> ReactionTally {
    let mut tally = ReactionTally::default();
    let mut attributed: u64 = 0;

    for (message, _, _) in usable(messages) {
        for reaction in &message.reactions {
            let Some(emoji) = reaction.emoji.as_deref().filter(|e| !e.is_empty()) else {
                continue;
            };
            *tally.totals.entry(emoji.to_string()).or_insert(0) += reaction.count;

            let mut listed: u64 = 0;
            for reactor in &reaction.recent {
                if let Some(user) = reactor.from.as_deref().filter(|u| !u.is_empty()) {
                    *tally
                        .per_user
                        .entry(user.to_string())
                        .or_default()
                        .entry(emoji.to_string())
                        .or_insert(0) += 1;
                    listed += 1;
                }
            }
            attributed += listed.min(reaction.count);
        }
    }

    let total: u64 = tally.totals.values().sum();
    tally.unattributed = total.saturating_sub(attributed);
    if tally.unattributed > 0 {
        tracing::debug!(
            total,
            unattributed = tally.unattributed,
            "Per-user reaction counts are partial"
        );
    }

    tally
}
