//! Persistence boundary for the standings engine
//!
//! This module defines the interface for loading and saving the engine's
//! entities by identifier, with an in-memory reference implementation and a
//! recording store for tests. Relations between entities are identifier
//! based and always resolved through this boundary.

pub mod memory;

pub use memory::InMemoryStore;

use crate::error::TournamentError;
use crate::types::{Match, MatchId, Player, PlayerId, Round, RoundId, Tournament, TournamentId};
use std::sync::Mutex;

/// Trait for entity storage operations.
///
/// `persist_match_result` is the one multi-entity write: it must apply the
/// completed match, both player ratings and the round atomically, with
/// read-your-writes consistency for subsequent loads.
pub trait TournamentStore: Send + Sync {
    fn load_player(&self, id: &PlayerId) -> crate::error::Result<Option<Player>>;

    fn save_player(&self, player: Player) -> crate::error::Result<()>;

    fn load_match(&self, id: &MatchId) -> crate::error::Result<Option<Match>>;

    fn save_match(&self, m: Match) -> crate::error::Result<()>;

    fn load_round(&self, id: &RoundId) -> crate::error::Result<Option<Round>>;

    fn save_round(&self, round: Round) -> crate::error::Result<()>;

    fn load_tournament(&self, id: &TournamentId) -> crate::error::Result<Option<Tournament>>;

    fn save_tournament(&self, tournament: Tournament) -> crate::error::Result<()>;

    /// All stored tournaments (for roster listings)
    fn list_tournaments(&self) -> crate::error::Result<Vec<Tournament>>;

    /// Persist one match result atomically: the completed match, both
    /// players' updated live ratings and the round carrying the updated
    /// scoreboard
    fn persist_match_result(
        &self,
        completed: Match,
        players: [Player; 2],
        round: Round,
    ) -> crate::error::Result<()>;

    /// Load every match of a round, in match-list order. A dangling match id
    /// is a consistency error, not a skipped entry.
    fn load_round_matches(&self, round: &Round) -> crate::error::Result<Vec<Match>> {
        let mut matches = Vec::with_capacity(round.match_ids.len());
        for match_id in &round.match_ids {
            let m = self
                .load_match(match_id)?
                .ok_or_else(|| TournamentError::MatchNotFound {
                    match_id: match_id.to_string(),
                })?;
            matches.push(m);
        }
        Ok(matches)
    }

    /// Every completed match across the tournament's rounds, used to build
    /// the tie-break history
    fn load_completed_matches(
        &self,
        tournament: &Tournament,
    ) -> crate::error::Result<Vec<Match>> {
        let mut completed = Vec::new();
        for round_id in &tournament.round_ids {
            let round = self
                .load_round(round_id)?
                .ok_or_else(|| TournamentError::RoundNotFound {
                    round_id: round_id.to_string(),
                })?;
            for m in self.load_round_matches(&round)? {
                if m.is_complete() {
                    completed.push(m);
                }
            }
        }
        Ok(completed)
    }
}

/// Store wrapper that records write calls for testing
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    player_saves: Mutex<Vec<PlayerId>>,
    match_saves: Mutex<Vec<MatchId>>,
    round_saves: Mutex<Vec<RoundId>>,
    tournament_saves: Mutex<Vec<TournamentId>>,
    result_persists: Mutex<Vec<MatchId>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match ids passed to `persist_match_result`, in call order
    pub fn result_persists(&self) -> Vec<MatchId> {
        self.result_persists
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn round_saves(&self) -> Vec<RoundId> {
        self.round_saves
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn match_saves(&self) -> Vec<MatchId> {
        self.match_saves
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn player_saves(&self) -> Vec<PlayerId> {
        self.player_saves
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn tournament_saves(&self) -> Vec<TournamentId> {
        self.tournament_saves
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record<T: Clone>(calls: &Mutex<Vec<T>>, value: T) {
        if let Ok(mut calls) = calls.lock() {
            calls.push(value);
        }
    }
}

impl TournamentStore for RecordingStore {
    fn load_player(&self, id: &PlayerId) -> crate::error::Result<Option<Player>> {
        self.inner.load_player(id)
    }

    fn save_player(&self, player: Player) -> crate::error::Result<()> {
        Self::record(&self.player_saves, player.id.clone());
        self.inner.save_player(player)
    }

    fn load_match(&self, id: &MatchId) -> crate::error::Result<Option<Match>> {
        self.inner.load_match(id)
    }

    fn save_match(&self, m: Match) -> crate::error::Result<()> {
        Self::record(&self.match_saves, m.id());
        self.inner.save_match(m)
    }

    fn load_round(&self, id: &RoundId) -> crate::error::Result<Option<Round>> {
        self.inner.load_round(id)
    }

    fn save_round(&self, round: Round) -> crate::error::Result<()> {
        Self::record(&self.round_saves, round.id);
        self.inner.save_round(round)
    }

    fn load_tournament(&self, id: &TournamentId) -> crate::error::Result<Option<Tournament>> {
        self.inner.load_tournament(id)
    }

    fn save_tournament(&self, tournament: Tournament) -> crate::error::Result<()> {
        Self::record(&self.tournament_saves, tournament.id);
        self.inner.save_tournament(tournament)
    }

    fn list_tournaments(&self) -> crate::error::Result<Vec<Tournament>> {
        self.inner.list_tournaments()
    }

    fn persist_match_result(
        &self,
        completed: Match,
        players: [Player; 2],
        round: Round,
    ) -> crate::error::Result<()> {
        Self::record(&self.result_persists, completed.id());
        self.inner.persist_match_result(completed, players, round)
    }
}
