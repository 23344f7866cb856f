//! Round progression: deciding when a round is finished and what follows
//!
//! The controller receives round-completion signals with at-least-once
//! delivery, so the whole path is idempotent: a tournament-scoped lock plus a
//! current-round recheck make redundant and concurrent signals safe no-ops.

use crate::engine::lifecycle::TournamentLifecycle;
use crate::error::{Result, TournamentError};
use crate::pairing::PairingProvider;
use crate::store::TournamentStore;
use crate::types::{RoundId, Tournament, TournamentId, TournamentStatus};
use crate::utils::KeyedLocks;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Receiver of round-completion signals. Delivery is at-least-once;
/// implementations must tolerate redundant and concurrent invocations for the
/// same round.
#[async_trait]
pub trait RoundCompletionSink: Send + Sync {
    async fn round_possibly_complete(&self, round_id: RoundId) -> Result<()>;
}

/// Checks round completion and advances or ends the owning tournament
pub struct RoundProgressionController {
    store: Arc<dyn TournamentStore>,
    pairing: Arc<dyn PairingProvider>,
    lifecycle: Arc<TournamentLifecycle>,
    tournament_locks: KeyedLocks<TournamentId>,
}

impl RoundProgressionController {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        pairing: Arc<dyn PairingProvider>,
        lifecycle: Arc<TournamentLifecycle>,
    ) -> Self {
        Self {
            store,
            pairing,
            lifecycle,
            tournament_locks: KeyedLocks::new(),
        }
    }

    /// Evaluate a round's completion state and act on it.
    ///
    /// A round is finished iff every match in its list is complete. If it is,
    /// either the next round is created or, when the configured round count
    /// is reached, the tournament is ended.
    pub async fn on_round_possibly_complete(&self, round_id: RoundId) -> Result<()> {
        let round = self
            .store
            .load_round(&round_id)?
            .ok_or_else(|| TournamentError::RoundNotFound {
                round_id: round_id.to_string(),
            })?;

        let matches = self.store.load_round_matches(&round)?;
        if matches.iter().any(|m| !m.is_complete()) {
            debug!(
                "Round {} of tournament {} still has pending matches",
                round.number, round.tournament_id
            );
            return Ok(());
        }

        // Only one completion signal may act per tournament at a time; the
        // recheck below turns every other delivery into a no-op.
        let _guard = self.tournament_locks.acquire(&round.tournament_id).await;

        let mut tournament: Tournament = self
            .store
            .load_tournament(&round.tournament_id)?
            .ok_or_else(|| TournamentError::TournamentNotFound {
                tournament_id: round.tournament_id.to_string(),
            })?;

        if tournament.status == TournamentStatus::Completed
            || tournament.current_round > round.number
        {
            debug!(
                "Round {} of tournament '{}' already processed",
                round.number, tournament.name
            );
            return Ok(());
        }

        if round.number >= tournament.no_of_rounds {
            info!(
                "Final round {} of tournament '{}' finished",
                round.number, tournament.name
            );
            self.lifecycle.end_tournament(tournament.id)
        } else {
            let next_round = self.pairing.create_next_round(tournament.id).await?;
            tournament.round_ids.push(next_round.id);
            tournament.current_round += 1;
            self.store.save_tournament(tournament.clone())?;

            info!(
                "Round {} of tournament '{}' finished, round {} created",
                round.number, tournament.name, next_round.number
            );
            Ok(())
        }
    }
}

#[async_trait]
impl RoundCompletionSink for RoundProgressionController {
    async fn round_possibly_complete(&self, round_id: RoundId) -> Result<()> {
        self.on_round_possibly_complete(round_id).await
    }
}
