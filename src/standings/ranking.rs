//! Deterministic ranking of scoreboard entries
//!
//! Ordering is recomputed from current tournament-wide state on every call:
//! cumulative score first, then a Buchholz-style tie-break (sum of the
//! current scores of all opponents faced in completed matches), then the
//! player identifier. The identifier fallback guarantees a total order; no
//! two entries ever compare equal.

use crate::standings::scoreboard::ScoreEntry;
use crate::types::{Match, PlayerId};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Opponents faced per player, extracted from a tournament's completed
/// matches. Pending matches contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct MatchHistory {
    opponents: HashMap<PlayerId, Vec<PlayerId>>,
}

impl MatchHistory {
    /// History with no completed matches; the tie-break degenerates to the
    /// identifier fallback
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the history from a tournament's matches, keeping only the
    /// completed ones
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut opponents: HashMap<PlayerId, Vec<PlayerId>> = HashMap::new();
        for m in matches {
            if !m.is_complete() {
                continue;
            }
            opponents
                .entry(m.player_one().clone())
                .or_default()
                .push(m.player_two().clone());
            opponents
                .entry(m.player_two().clone())
                .or_default()
                .push(m.player_one().clone());
        }
        Self { opponents }
    }

    pub fn opponents_of(&self, player_id: &PlayerId) -> &[PlayerId] {
        self.opponents
            .get(player_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Buchholz-style tie-break: the sum of the current scores of every opponent
/// the player has faced in completed matches
pub fn buchholz_score(
    player_id: &PlayerId,
    entries: &[ScoreEntry],
    history: &MatchHistory,
) -> f64 {
    let scores: HashMap<&PlayerId, f64> = entries
        .iter()
        .map(|entry| (&entry.player_id, entry.score))
        .collect();

    history
        .opponents_of(player_id)
        .iter()
        .filter_map(|opponent| scores.get(opponent))
        .sum()
}

/// Produce the ranked order of `entries`: score descending, Buchholz
/// descending, player identifier ascending.
///
/// Pure: the result depends only on the arguments, never on the incoming
/// order, so re-ranking a ranked scoreboard is a no-op.
pub fn rank(entries: &[ScoreEntry], history: &MatchHistory) -> Vec<ScoreEntry> {
    let tie_breaks: HashMap<&PlayerId, f64> = entries
        .iter()
        .map(|entry| {
            (
                &entry.player_id,
                buchholz_score(&entry.player_id, entries, history),
            )
        })
        .collect();

    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                tie_breaks[&b.player_id]
                    .partial_cmp(&tie_breaks[&a.player_id])
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    ranked
}
