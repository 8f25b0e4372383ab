//! Reply network between selected participants.

use crate::ingest::{usable, NormalizedMessage};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// "`sender` replied to a message from `replied_to`", `weight` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyEdge {
    pub sender: String,
    pub replied_to: String,
    pub weight: u64,
}

/// Range that edge weights are rescaled into for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayScale {
    pub min: f64,
    pub max: f64,
    /// Width used when every edge has the same weight
    pub uniform: f64,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 5.0,
            uniform: 2.0,
        }
    }
}

/// Directed, weighted reply graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplyGraph {
    /// Participants the graph was built for
    pub participants: Vec<String>,
    /// Edges ordered by sender, then replied-to
    pub edges: Vec<ReplyEdge>,
}

impl ReplyGraph {
    /// Edge widths linearly rescaled into `scale`, aligned with `edges`.
    pub fn display_widths(&self, scale: DisplayScale) -> Vec<f64> {
        let (Some(lo), Some(hi)) = (
            self.edges.iter().map(|e| e.weight).min(),
            self.edges.iter().map(|e| e.weight).max(),
        ) else {
            return Vec::new();
        };

        if lo == hi {
            return vec![scale.uniform; self.edges.len()];
        }

        let span = (hi - lo) as f64;
        self.edges
            .iter()
            .map(|e| scale.min + (scale.max - scale.min) * (e.weight - lo) as f64 / span)
            .collect()
    }

    /// Weight of a single edge, 0 if absent.
    pub fn weight(&self, sender: &str, replied_to: &str) -> u64 {
        self.edges
            .iter()
            .find(|e| e.sender == sender && e.replied_to == replied_to)
            .map_or(0, |e| e.weight)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Build reply edges among `selection`.
///
/// A reply counts only when both the replier and the author of the
/// replied-to message are selected and differ. Replies to messages that are
/// not in the export (or not from a selected sender) are dropped.
pub fn build_reply_graph(
    messages: &[NormalizedMessage<'_>],
    selection: &BTreeSet<String>,
) -> ReplyGraph {
    let author_of: HashMap<i64, &str> = usable(messages)
        .filter(|(_, sender, _)| selection.contains(*sender))
        .filter_map(|(message, sender, _)| Some((message.id?, sender)))
        .collect();

    let mut weights: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for (message, sender, _) in usable(messages) {
        if !selection.contains(sender) {
            continue;
        }
        let Some(target) = message.reply_to_message_id else {
            continue;
        };
        match author_of.get(&target) {
            Some(&replied_to) if replied_to != sender => {
                *weights.entry((sender, replied_to)).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    let edges: Vec<ReplyEdge> = weights
        .into_iter()
        .map(|((sender, replied_to), weight)| ReplyEdge {
            sender: sender.to_string(),
            replied_to: replied_to.to_string(),
            weight,
        })
        .collect();

    tracing::debug!(
        participants = selection.len(),
        edges = edges.len(),
        "Built reply graph"
    );

    ReplyGraph {
        participants: selection.iter().cloned().collect(),
        edges,
    }
}
