//! Test fixtures and shared system setup for integration testing

use async_trait::async_trait;
use crosstable::engine::{
    MatchResultProcessor, RoundCompletionSink, RoundProgressionController, TournamentLifecycle,
};
use crosstable::error::Result;
use crosstable::pairing::StandingsPairingProvider;
use crosstable::rating::elo::{EloConfig, EloRatingCalculator};
use crosstable::store::{InMemoryStore, TournamentStore};
use crosstable::types::{Player, RoundId, Tournament};
use std::sync::{Arc, Mutex};

/// Fully wired engine over an in-memory store
pub struct TestSystem {
    pub store: Arc<InMemoryStore>,
    pub lifecycle: Arc<TournamentLifecycle>,
    pub progression: Arc<RoundProgressionController>,
    pub processor: Arc<MatchResultProcessor>,
}

/// Build the complete system: store -> pairing -> lifecycle -> progression
/// -> processor, with progression wired in as the completion sink
pub fn create_test_system() -> TestSystem {
    let store = Arc::new(InMemoryStore::new());
    let pairing = Arc::new(StandingsPairingProvider::new(store.clone()));
    let lifecycle = Arc::new(TournamentLifecycle::new(store.clone(), pairing.clone()));
    let progression = Arc::new(RoundProgressionController::new(
        store.clone(),
        pairing,
        lifecycle.clone(),
    ));
    let processor = Arc::new(MatchResultProcessor::new(
        store.clone(),
        Arc::new(EloRatingCalculator::new(EloConfig::default()).unwrap()),
        progression.clone(),
    ));

    TestSystem {
        store,
        lifecycle,
        progression,
        processor,
    }
}

/// Create a started tournament with the given players (id, rating)
pub async fn start_tournament(
    system: &TestSystem,
    players: &[(&str, f64)],
    rounds: u32,
) -> Tournament {
    let mut tournament = system
        .lifecycle
        .create_tournament("Integration Open", players.len(), rounds)
        .unwrap();
    for (id, rating) in players {
        system
            .store
            .save_player(Player::new(*id, *rating))
            .unwrap();
        tournament.participants.push(id.to_string());
    }
    system.store.save_tournament(tournament.clone()).unwrap();
    system.lifecycle.start(tournament.id).await.unwrap()
}

/// Sink that records delivered round-completion signals without acting
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<RoundId>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<RoundId> {
        self.delivered
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RoundCompletionSink for RecordingSink {
    async fn round_possibly_complete(&self, round_id: RoundId) -> Result<()> {
        if let Ok(mut ids) = self.delivered.lock() {
            ids.push(round_id);
        }
        Ok(())
    }
}
