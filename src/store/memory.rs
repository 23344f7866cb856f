//! In-memory store implementation
//!
//! All four entity maps live behind a single RwLock so the multi-entity
//! match-result write is atomic and later reads observe it in full.

use crate::error::TournamentError;
use crate::store::TournamentStore;
use crate::types::{Match, MatchId, Player, PlayerId, Round, RoundId, Tournament, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Entities {
    players: HashMap<PlayerId, Player>,
    matches: HashMap<MatchId, Match>,
    rounds: HashMap<RoundId, Round>,
    tournaments: HashMap<TournamentId, Tournament>,
}

/// In-memory reference implementation of the persistence boundary
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entities: RwLock<Entities>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> crate::error::Result<std::sync::RwLockReadGuard<'_, Entities>> {
        self.entities
            .read()
            .map_err(|_| {
                TournamentError::TransientFailure {
                    message: "Failed to acquire store read lock".to_string(),
                }
                .into()
            })
    }

    fn write(&self) -> crate::error::Result<std::sync::RwLockWriteGuard<'_, Entities>> {
        self.entities
            .write()
            .map_err(|_| {
                TournamentError::TransientFailure {
                    message: "Failed to acquire store write lock".to_string(),
                }
                .into()
            })
    }
}

impl TournamentStore for InMemoryStore {
    fn load_player(&self, id: &PlayerId) -> crate::error::Result<Option<Player>> {
        Ok(self.read()?.players.get(id).cloned())
    }

    fn save_player(&self, player: Player) -> crate::error::Result<()> {
        self.write()?.players.insert(player.id.clone(), player);
        Ok(())
    }

    fn load_match(&self, id: &MatchId) -> crate::error::Result<Option<Match>> {
        Ok(self.read()?.matches.get(id).cloned())
    }

    fn save_match(&self, m: Match) -> crate::error::Result<()> {
        self.write()?.matches.insert(m.id(), m);
        Ok(())
    }

    fn load_round(&self, id: &RoundId) -> crate::error::Result<Option<Round>> {
        Ok(self.read()?.rounds.get(id).cloned())
    }

    fn save_round(&self, round: Round) -> crate::error::Result<()> {
        self.write()?.rounds.insert(round.id, round);
        Ok(())
    }

    fn load_tournament(&self, id: &TournamentId) -> crate::error::Result<Option<Tournament>> {
        Ok(self.read()?.tournaments.get(id).cloned())
    }

    fn save_tournament(&self, tournament: Tournament) -> crate::error::Result<()> {
        self.write()?.tournaments.insert(tournament.id, tournament);
        Ok(())
    }

    fn list_tournaments(&self) -> crate::error::Result<Vec<Tournament>> {
        Ok(self.read()?.tournaments.values().cloned().collect())
    }

    fn persist_match_result(
        &self,
        completed: Match,
        players: [Player; 2],
        round: Round,
    ) -> crate::error::Result<()> {
        // One write guard spans all four inserts
        let mut entities = self.write()?;
        entities.matches.insert(completed.id(), completed);
        for player in players {
            entities.players.insert(player.id.clone(), player);
        }
        entities.rounds.insert(round.id, round);
        Ok(())
    }
}
