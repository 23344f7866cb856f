//! Participant registration for tournaments in setup
//!
//! The roster only changes while a tournament is in Setup; once started, the
//! participant list is frozen and the scoring engine relies on it matching
//! the seeded scoreboards. All listings filter over snapshots; nothing is
//! removed from a collection while it is being walked.

use crate::error::{Result, TournamentError};
use crate::store::TournamentStore;
use crate::types::{PlayerId, Tournament, TournamentId, TournamentStatus};
use std::sync::Arc;
use tracing::info;

/// Manages tournament rosters during setup
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn TournamentStore>,
}

impl RosterService {
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

    fn require_setup(&self, tournament: &Tournament) -> Result<()> {
        if tournament.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidTournamentStatus {
                tournament_id: tournament.id.to_string(),
                status: tournament.status.to_string(),
                expected: TournamentStatus::Setup.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Register a player for a tournament in setup
    pub fn register(&self, tournament_id: TournamentId, player_id: &PlayerId) -> Result<Tournament> {
        let mut tournament = self.load_tournament(tournament_id)?;
        self.require_setup(&tournament)?;

        self.store
            .load_player(player_id)?
            .ok_or_else(|| TournamentError::PlayerNotFound {
                player_id: player_id.clone(),
            })?;

        if tournament.is_full() {
            return Err(TournamentError::TournamentFull {
                tournament_id: tournament_id.to_string(),
            }
            .into());
        }
        if tournament.has_participant(player_id) {
            return Err(TournamentError::DuplicateRegistration {
                player_id: player_id.clone(),
                tournament_id: tournament_id.to_string(),
            }
            .into());
        }

        tournament.participants.push(player_id.clone());
        self.store.save_tournament(tournament.clone())?;

        info!(
            "Player '{}' registered for tournament '{}' ({}/{})",
            player_id,
            tournament.name,
            tournament.player_count(),
            tournament.size
        );
        Ok(tournament)
    }

    /// Withdraw a registered player from a tournament in setup
    pub fn withdraw(&self, tournament_id: TournamentId, player_id: &PlayerId) -> Result<Tournament> {
        let mut tournament = self.load_tournament(tournament_id)?;
        self.require_setup(&tournament)?;

        if !tournament.has_participant(player_id) {
            return Err(TournamentError::NotRegistered {
                player_id: player_id.clone(),
                tournament_id: tournament_id.to_string(),
            }
            .into());
        }

        tournament.participants.retain(|p| p != player_id);
        self.store.save_tournament(tournament.clone())?;

        info!(
            "Player '{}' withdrew from tournament '{}'",
            player_id, tournament.name
        );
        Ok(tournament)
    }

    /// Tournaments in setup that the player could still join
    pub fn open_tournaments_for(&self, player_id: &PlayerId) -> Result<Vec<Tournament>> {
        let tournaments = self.store.list_tournaments()?;
        Ok(tournaments
            .into_iter()
            .filter(|t| {
                t.status == TournamentStatus::Setup
                    && !t.is_full()
                    && !t.has_participant(player_id)
            })
            .collect())
    }

    /// All tournaments with the given status
    pub fn tournaments_by_status(&self, status: TournamentStatus) -> Result<Vec<Tournament>> {
        let tournaments = self.store.list_tournaments()?;
        Ok(tournaments
            .into_iter()
            .filter(|t| t.status == status)
            .collect())
    }
}
