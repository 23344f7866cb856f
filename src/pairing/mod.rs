//! Pairing collaborator interface and the default standings-based provider
//!
//! The engine treats pairing as an opaque collaborator: it hands back a
//! persisted round with a populated match list and a seeded scoreboard entry
//! for every participant. The bundled provider pairs adjacent players by
//! rating for the opening round and by current standings afterwards; nothing
//! in the engine depends on that heuristic.

use crate::error::{Result, TournamentError};
use crate::standings::scoreboard::Scoreboard;
use crate::store::TournamentStore;
use crate::types::{Match, Player, Round, Tournament, TournamentId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Trait for building a tournament's rounds
#[async_trait]
pub trait PairingProvider: Send + Sync {
    /// Build, persist and return the opening round for a tournament
    async fn create_first_round(&self, tournament_id: TournamentId) -> Result<Round>;

    /// Build, persist and return the round following the latest one,
    /// carrying the running standings forward
    async fn create_next_round(&self, tournament_id: TournamentId) -> Result<Round>;
}

/// Default pairing provider: adjacent pairing over a deterministic order
#[derive(Clone)]
pub struct StandingsPairingProvider {
    store: Arc<dyn TournamentStore>,
}

impl StandingsPairingProvider {
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self { store }
    }

    fn load_tournament(&self, tournament_id: TournamentId) -> Result<Tournament> {
        self.store
            .load_tournament(&tournament_id)?
            .ok_or_else(|| {
                TournamentError::TournamentNotFound {
                    tournament_id: tournament_id.to_string(),
                }
                .into()
            })
    }

    fn load_participants(&self, tournament: &Tournament) -> Result<Vec<Player>> {
        let mut players = Vec::with_capacity(tournament.participants.len());
        for player_id in &tournament.participants {
            let player =
                self.store
                    .load_player(player_id)?
                    .ok_or_else(|| TournamentError::PlayerNotFound {
                        player_id: player_id.clone(),
                    })?;
            players.push(player);
        }
        Ok(players)
    }

    /// Pair adjacent players, persist the matches and the round
    fn build_round(
        &self,
        tournament: &Tournament,
        number: u32,
        ordered_players: Vec<Player>,
        scoreboard: Scoreboard,
    ) -> Result<Round> {
        if ordered_players.len() % 2 != 0 {
            return Err(TournamentError::InvalidTournamentConfig {
                reason: format!(
                    "cannot pair an odd number of players ({})",
                    ordered_players.len()
                ),
            }
            .into());
        }

        let mut round = Round::new(tournament.id, number, scoreboard);
        for pair in ordered_players.chunks(2) {
            let m = Match::new(round.id, &pair[0], &pair[1]);
            round.match_ids.push(m.id());
            self.store.save_match(m)?;
        }
        self.store.save_round(round.clone())?;

        info!(
            "Paired round {} of tournament '{}' with {} matches",
            number,
            tournament.name,
            round.match_ids.len()
        );
        Ok(round)
    }
}

#[async_trait]
impl PairingProvider for StandingsPairingProvider {
    async fn create_first_round(&self, tournament_id: TournamentId) -> Result<Round> {
        let tournament = self.load_tournament(tournament_id)?;
        let mut players = self.load_participants(&tournament)?;

        // Opening order: rating descending, identifier as the deterministic
        // fallback
        players.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let scoreboard = Scoreboard::seeded(tournament.participants.iter().cloned());
        self.build_round(&tournament, 1, players, scoreboard)
    }

    async fn create_next_round(&self, tournament_id: TournamentId) -> Result<Round> {
        let tournament = self.load_tournament(tournament_id)?;
        let last_round_id = tournament.round_ids.last().ok_or_else(|| {
            TournamentError::InvalidTournamentStatus {
                tournament_id: tournament_id.to_string(),
                status: tournament.status.to_string(),
                expected: "at least one existing round".to_string(),
            }
        })?;
        let last_round =
            self.store
                .load_round(last_round_id)?
                .ok_or_else(|| TournamentError::RoundNotFound {
                    round_id: last_round_id.to_string(),
                })?;

        // Standings order from the previous scoreboard; scores carry forward
        let mut players = Vec::with_capacity(last_round.scoreboard.len());
        for entry in last_round.scoreboard.entries() {
            let player = self.store.load_player(&entry.player_id)?.ok_or_else(|| {
                TournamentError::PlayerNotFound {
                    player_id: entry.player_id.clone(),
                }
            })?;
            players.push(player);
        }

        let scoreboard = last_round.scoreboard.clone();
        self.build_round(&tournament, last_round.number + 1, players, scoreboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::MatchOutcome;

    fn system_with_players(ratings: &[(&str, f64)]) -> (Arc<InMemoryStore>, Tournament) {
        let store = Arc::new(InMemoryStore::new());
        let mut tournament = Tournament::new("Open", ratings.len(), 3);
        for (id, rating) in ratings {
            store.save_player(Player::new(*id, *rating)).unwrap();
            tournament.participants.push(id.to_string());
        }
        store.save_tournament(tournament.clone()).unwrap();
        (store, tournament)
    }

    #[tokio::test]
    async fn test_first_round_pairs_by_rating() {
        let (store, tournament) = system_with_players(&[
            ("alice", 1200.0),
            ("bob", 1800.0),
            ("carol", 1600.0),
            ("dave", 1000.0),
        ]);
        let provider = StandingsPairingProvider::new(store.clone());

        let round = provider.create_first_round(tournament.id).await.unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(round.match_ids.len(), 2);
        assert_eq!(round.scoreboard.len(), 4);

        // Rating order bob(1800) carol(1600) | alice(1200) dave(1000)
        let matches = store.load_round_matches(&round).unwrap();
        assert_eq!(matches[0].player_one(), "bob");
        assert_eq!(matches[0].player_two(), "carol");
        assert_eq!(matches[1].player_one(), "alice");
        assert_eq!(matches[1].player_two(), "dave");

        // Snapshots captured at pairing time
        assert_eq!(matches[0].player_one_start_rating(), 1800.0);
        assert_eq!(matches[1].player_two_start_rating(), 1000.0);
    }

    #[tokio::test]
    async fn test_next_round_carries_standings_forward() {
        let (store, tournament) =
            system_with_players(&[("alice", 1000.0), ("bob", 1000.0)]);
        let provider = StandingsPairingProvider::new(store.clone());

        let mut first = provider.create_first_round(tournament.id).await.unwrap();
        first
            .scoreboard
            .apply_outcome(
                &"alice".to_string(),
                &"bob".to_string(),
                MatchOutcome::PlayerOneWin,
                &crate::standings::ranking::MatchHistory::empty(),
            )
            .unwrap();
        store.save_round(first.clone()).unwrap();
        let mut stored = store.load_tournament(&tournament.id).unwrap().unwrap();
        stored.round_ids.push(first.id);
        store.save_tournament(stored).unwrap();

        let next = provider.create_next_round(tournament.id).await.unwrap();
        assert_eq!(next.number, 2);
        // Cumulative scores carried into the new round's board
        assert_eq!(next.scoreboard.score_of(&"alice".to_string()), Some(1.0));
        assert_eq!(next.scoreboard.score_of(&"bob".to_string()), Some(0.0));

        // Standings leader is seeded first
        let matches = store.load_round_matches(&next).unwrap();
        assert_eq!(matches[0].player_one(), "alice");
    }

    #[tokio::test]
    async fn test_first_round_unknown_tournament() {
        let store = Arc::new(InMemoryStore::new());
        let provider = StandingsPairingProvider::new(store);

        let err = provider
            .create_first_round(crate::utils::generate_tournament_id())
            .await
            .unwrap_err();
        let err = err.downcast::<TournamentError>().unwrap();
        assert!(matches!(err, TournamentError::TournamentNotFound { .. }));
    }
}
