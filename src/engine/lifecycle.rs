//! Tournament lifecycle state machine
//!
//! Status transitions are monotonic: Setup -> Ongoing -> Completed, never
//! backward. Round creation is delegated to the pairing collaborator.

use crate::error::{Result, TournamentError};
use crate::pairing::PairingProvider;
use crate::standings::scoreboard::Scoreboard;
use crate::store::TournamentStore;
use crate::types::{Tournament, TournamentId, TournamentStatus};
use std::sync::Arc;
use tracing::{debug, info};

/// Coordinates tournament creation, start and termination
#[derive(Clone)]
pub struct TournamentLifecycle {
    store: Arc<dyn TournamentStore>,
    pairing: Arc<dyn PairingProvider>,
}

impl TournamentLifecycle {
    pub fn new(store: Arc<dyn TournamentStore>, pairing: Arc<dyn PairingProvider>) -> Self {
        Self { store, pairing }
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

    /// Create a tournament in Setup. Pairing requires even cardinality, so an
    /// odd or zero size is rejected up front.
    pub fn create_tournament(
        &self,
        name: &str,
        size: usize,
        no_of_rounds: u32,
    ) -> Result<Tournament> {
        if size == 0 || size % 2 != 0 {
            return Err(TournamentError::InvalidTournamentConfig {
                reason: format!("tournament size must be even and non-zero, got {}", size),
            }
            .into());
        }
        if no_of_rounds == 0 {
            return Err(TournamentError::InvalidTournamentConfig {
                reason: "tournament must have at least one round".to_string(),
            }
            .into());
        }

        let tournament = Tournament::new(name, size, no_of_rounds);
        self.store.save_tournament(tournament.clone())?;

        info!(
            "Created tournament '{}' ({} players, {} rounds)",
            tournament.name, tournament.size, tournament.no_of_rounds
        );
        Ok(tournament)
    }

    /// Start a tournament: request the first round from the pairing
    /// collaborator, append it and move to Ongoing
    pub async fn start(&self, tournament_id: TournamentId) -> Result<Tournament> {
        let mut tournament = self.load_tournament(tournament_id)?;

        if tournament.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidTournamentStatus {
                tournament_id: tournament_id.to_string(),
                status: tournament.status.to_string(),
                expected: TournamentStatus::Setup.to_string(),
            }
            .into());
        }

        // The seeded scoreboard must cover every participant, so the roster
        // has to be complete before pairing
        if tournament.player_count() != tournament.size {
            return Err(TournamentError::RosterIncomplete {
                tournament_id: tournament_id.to_string(),
                registered: tournament.player_count(),
                required: tournament.size,
            }
            .into());
        }

        let first_round = self.pairing.create_first_round(tournament_id).await?;
        tournament.round_ids.push(first_round.id);
        tournament.current_round = 1;
        tournament.status = TournamentStatus::Ongoing;
        self.store.save_tournament(tournament.clone())?;

        info!("Tournament '{}' started", tournament.name);
        Ok(tournament)
    }

    /// Terminate a tournament. The final ranking is the last round's
    /// scoreboard order; nothing is recomputed here. Ending an already
    /// completed tournament is a no-op so redundant completion signals stay
    /// safe.
    pub fn end_tournament(&self, tournament_id: TournamentId) -> Result<()> {
        let mut tournament = self.load_tournament(tournament_id)?;

        match tournament.status {
            TournamentStatus::Completed => {
                debug!("Tournament '{}' already completed", tournament.name);
                Ok(())
            }
            TournamentStatus::Setup => Err(TournamentError::InvalidTournamentStatus {
                tournament_id: tournament_id.to_string(),
                status: tournament.status.to_string(),
                expected: TournamentStatus::Ongoing.to_string(),
            }
            .into()),
            TournamentStatus::Ongoing => {
                tournament.status = TournamentStatus::Completed;
                self.store.save_tournament(tournament.clone())?;
                info!("Tournament '{}' completed", tournament.name);
                Ok(())
            }
        }
    }

    /// The last round's scoreboard, which is the final ranking once the
    /// tournament has completed
    pub fn final_standings(&self, tournament_id: TournamentId) -> Result<Scoreboard> {
        let tournament = self.load_tournament(tournament_id)?;
        let last_round_id = tournament.round_ids.last().ok_or_else(|| {
            TournamentError::InvalidTournamentStatus {
                tournament_id: tournament_id.to_string(),
                status: tournament.status.to_string(),
                expected: "a started tournament with at least one round".to_string(),
            }
        })?;

        let round = self
            .store
            .load_round(last_round_id)?
            .ok_or_else(|| TournamentError::RoundNotFound {
                round_id: last_round_id.to_string(),
            })?;
        Ok(round.scoreboard)
    }
}
