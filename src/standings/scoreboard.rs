//! Per-round scoreboard and score application
//!
//! One scoreboard exists per round, with exactly one entry per participant.
//! Scores only ever grow: a draw adds 0.5 to each side, a decisive result
//! adds 1 to the winner.

use crate::error::{Result, TournamentError};
use crate::standings::ranking::{rank, MatchHistory};
use crate::types::{MatchOutcome, PlayerId};
use serde::{Deserialize, Serialize};

/// A (player, cumulative score) pair within one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_id: PlayerId,
    pub score: f64,
}

/// Ordered sequence of score entries for one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Seed a scoreboard with zero-score entries for every given player,
    /// ranked (identifier order, since all scores are equal)
    pub fn seeded<I, S>(player_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerId>,
    {
        let entries: Vec<ScoreEntry> = player_ids
            .into_iter()
            .map(|id| ScoreEntry {
                player_id: id.into(),
                score: 0.0,
            })
            .collect();

        Self {
            entries: rank(&entries, &MatchHistory::empty()),
        }
    }

    /// Entries in their current ranked order
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.entries.iter().any(|e| &e.player_id == player_id)
    }

    pub fn score_of(&self, player_id: &PlayerId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.player_id == player_id)
            .map(|e| e.score)
    }

    /// Apply one match result to the two players' entries, then re-rank the
    /// whole board against the given history.
    ///
    /// Fails with `PlayerNotInScoreboard` if either player has no entry; the
    /// board is left unmutated in that case. A missing entry is a consistency
    /// error, never an occasion to insert one.
    pub fn apply_outcome(
        &mut self,
        player_one: &PlayerId,
        player_two: &PlayerId,
        outcome: MatchOutcome,
        history: &MatchHistory,
    ) -> Result<()> {
        for player_id in [player_one, player_two] {
            if !self.contains(player_id) {
                return Err(TournamentError::PlayerNotInScoreboard {
                    player_id: player_id.clone(),
                }
                .into());
            }
        }

        for entry in &mut self.entries {
            if &entry.player_id == player_one {
                entry.score += outcome.win_value_one();
            } else if &entry.player_id == player_two {
                entry.score += outcome.win_value_two();
            }
        }

        self.entries = rank(&self.entries, history);
        Ok(())
    }
}
