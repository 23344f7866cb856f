//! Match result processing
//!
//! The processor owns the full scoring sequence for one reported outcome:
//! validate the match, compute rating changes from the captured starting
//! ratings, update both live ratings and the round scoreboard, persist the
//! three writes atomically, then signal round progression.

use crate::engine::progression::RoundCompletionSink;
use crate::error::{Result, TournamentError};
use crate::rating::calculator::RatingCalculator;
use crate::standings::ranking::MatchHistory;
use crate::store::TournamentStore;
use crate::types::{Match, MatchId, MatchOutcome, Player, PlayerId, RoundId};
use crate::utils::KeyedLocks;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Counters over processor activity
#[derive(Debug, Clone, Default)]
pub struct ProcessorStats {
    /// Results accepted and persisted
    pub matches_scored: u64,
    /// Reports rejected before any state change
    pub reports_rejected: u64,
}

/// Orchestrates scoring of reported match results
pub struct MatchResultProcessor {
    store: Arc<dyn TournamentStore>,
    calculator: Arc<dyn RatingCalculator>,
    completion_sink: Arc<dyn RoundCompletionSink>,
    round_locks: KeyedLocks<RoundId>,
    stats: RwLock<ProcessorStats>,
}

impl MatchResultProcessor {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        calculator: Arc<dyn RatingCalculator>,
        completion_sink: Arc<dyn RoundCompletionSink>,
    ) -> Self {
        Self {
            store,
            calculator,
            completion_sink,
            round_locks: KeyedLocks::new(),
            stats: RwLock::new(ProcessorStats::default()),
        }
    }

    /// Current processing counters
    pub fn stats(&self) -> ProcessorStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn record_scored(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.matches_scored += 1;
        }
    }

    fn record_rejected(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.reports_rejected += 1;
        }
    }

    fn load_match(&self, match_id: MatchId) -> Result<Match> {
        self.store
            .load_match(&match_id)?
            .ok_or_else(|| {
                TournamentError::MatchNotFound {
                    match_id: match_id.to_string(),
                }
                .into()
            })
    }

    fn load_player(&self, player_id: &PlayerId) -> Result<Player> {
        self.store
            .load_player(player_id)?
            .ok_or_else(|| {
                TournamentError::PlayerNotFound {
                    player_id: player_id.clone(),
                }
                .into()
            })
    }

    /// Process one reported outcome, outcome_code in {-1, 0, 1}.
    ///
    /// All-or-nothing: a failure anywhere in the sequence leaves no
    /// partially-applied state. Ratings and scoreboards are write-once per
    /// match; a second report on the same match fails with
    /// `MatchAlreadyComplete`.
    pub async fn report_result(&self, match_id: MatchId, outcome_code: i8) -> Result<()> {
        let outcome = match MatchOutcome::from_code(outcome_code) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.record_rejected();
                return Err(e);
            }
        };

        // First load only locates the owning round for lock scoping
        let round_id = match self.load_match(match_id) {
            Ok(m) => m.round_id(),
            Err(e) => {
                self.record_rejected();
                return Err(e);
            }
        };

        // Scoreboard mutation for one round is serialized; the guard is
        // released before progression is signalled
        let result = {
            let _guard = self.round_locks.acquire(&round_id).await;
            self.score_match(match_id, outcome)
        };

        match result {
            Ok(()) => {
                self.record_scored();
                info!(
                    "Match {} scored with outcome {}, notifying round {}",
                    match_id, outcome_code, round_id
                );
                self.completion_sink.round_possibly_complete(round_id).await
            }
            Err(e) => {
                self.record_rejected();
                Err(e)
            }
        }
    }

    /// Steps 1-5 of the scoring sequence; runs under the round lock
    fn score_match(&self, match_id: MatchId, outcome: MatchOutcome) -> Result<()> {
        // Re-load under the lock: observing the completion flag here is the
        // compare-and-set that makes the second of two racing reports fail
        let mut current = self.load_match(match_id)?;
        if current.is_complete() {
            return Err(TournamentError::MatchAlreadyComplete {
                match_id: match_id.to_string(),
            }
            .into());
        }

        let mut player_one = self.load_player(current.player_one())?;
        let mut player_two = self.load_player(current.player_two())?;

        // Rating math uses the starting snapshots, never the live ratings
        let start_one = current.player_one_start_rating();
        let start_two = current.player_two_start_rating();
        let (new_one, new_two) = self
            .calculator
            .compute_new_ratings(start_one, start_two, outcome)?;

        current.complete(outcome, new_one - start_one, new_two - start_two)?;
        player_one.rating = new_one;
        player_two.rating = new_two;

        let mut round =
            self.store
                .load_round(&current.round_id())?
                .ok_or_else(|| TournamentError::RoundNotFound {
                    round_id: current.round_id().to_string(),
                })?;
        let tournament = self
            .store
            .load_tournament(&round.tournament_id)?
            .ok_or_else(|| TournamentError::TournamentNotFound {
                tournament_id: round.tournament_id.to_string(),
            })?;

        // Tie-break history spans the tournament's completed matches,
        // including the one being scored right now
        let mut completed = self.store.load_completed_matches(&tournament)?;
        completed.push(current.clone());
        let history = MatchHistory::from_matches(completed.iter());

        round
            .scoreboard
            .apply_outcome(&player_one.id, &player_two.id, outcome, &history)?;

        debug!(
            "Match {}: {} {:+.2} -> {:.2}, {} {:+.2} -> {:.2}",
            match_id,
            player_one.id,
            new_one - start_one,
            new_one,
            player_two.id,
            new_two - start_two,
            new_two
        );

        self.store
            .persist_match_result(current, [player_one, player_two], round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::elo::{EloConfig, EloRatingCalculator};
    use crate::standings::scoreboard::Scoreboard;
    use crate::store::RecordingStore;
    use crate::types::{Round, Tournament};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Sink that records delivered round ids without acting on them
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<RoundId>>,
    }

    impl RecordingSink {
        fn delivered(&self) -> Vec<RoundId> {
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

    struct Fixture {
        store: Arc<RecordingStore>,
        sink: Arc<RecordingSink>,
        processor: MatchResultProcessor,
        match_id: MatchId,
        round_id: RoundId,
    }

    /// Two-player tournament with one pending match, scoreboard seeded
    fn fixture_with_ratings(rating_one: f64, rating_two: f64) -> Fixture {
        let store = Arc::new(RecordingStore::new());
        let alice = Player::new("alice", rating_one);
        let bob = Player::new("bob", rating_two);
        store.save_player(alice.clone()).unwrap();
        store.save_player(bob.clone()).unwrap();

        let tournament = Tournament::new("Club Night", 2, 1);
        let mut round = Round::new(
            tournament.id,
            1,
            Scoreboard::seeded(["alice".to_string(), "bob".to_string()]),
        );
        let m = Match::new(round.id, &alice, &bob);
        round.match_ids.push(m.id());
        store.save_match(m.clone()).unwrap();
        store.save_round(round.clone()).unwrap();
        let mut tournament = tournament;
        tournament.round_ids.push(round.id);
        store.save_tournament(tournament).unwrap();

        let sink = Arc::new(RecordingSink::default());
        let processor = MatchResultProcessor::new(
            store.clone(),
            Arc::new(EloRatingCalculator::new(EloConfig::default()).unwrap()),
            sink.clone(),
        );
        Fixture {
            store,
            sink,
            processor,
            match_id: m.id(),
            round_id: round.id,
        }
    }

    #[tokio::test]
    async fn test_report_result_updates_everything() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);
        fixture
            .processor
            .report_result(fixture.match_id, -1)
            .await
            .unwrap();

        // Match carries outcome, deltas and the flag
        let scored = fixture
            .store
            .load_match(&fixture.match_id)
            .unwrap()
            .unwrap();
        assert!(scored.is_complete());
        assert_eq!(scored.outcome(), Some(MatchOutcome::PlayerOneWin));
        let (delta_one, delta_two) = scored.rating_deltas().unwrap();
        assert!((delta_one - 10.0).abs() < 1e-9);
        assert!((delta_two + 10.0).abs() < 1e-9);

        // Live ratings moved
        let alice = fixture
            .store
            .load_player(&"alice".to_string())
            .unwrap()
            .unwrap();
        let bob = fixture
            .store
            .load_player(&"bob".to_string())
            .unwrap()
            .unwrap();
        assert!((alice.rating - 1010.0).abs() < 1e-9);
        assert!((bob.rating - 990.0).abs() < 1e-9);

        // Scoreboard updated and persisted exactly once
        let round = fixture
            .store
            .load_round(&fixture.round_id)
            .unwrap()
            .unwrap();
        assert_eq!(round.scoreboard.score_of(&"alice".to_string()), Some(1.0));
        assert_eq!(round.scoreboard.score_of(&"bob".to_string()), Some(0.0));
        assert_eq!(fixture.store.result_persists().len(), 1);

        // Completion signal delivered for the round
        assert_eq!(fixture.sink.delivered(), vec![fixture.round_id]);

        let stats = fixture.processor.stats();
        assert_eq!(stats.matches_scored, 1);
        assert_eq!(stats.reports_rejected, 0);
    }

    #[tokio::test]
    async fn test_draw_persists_single_save() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);
        fixture
            .processor
            .report_result(fixture.match_id, 0)
            .await
            .unwrap();

        let round = fixture
            .store
            .load_round(&fixture.round_id)
            .unwrap()
            .unwrap();
        assert_eq!(round.scoreboard.score_of(&"alice".to_string()), Some(0.5));
        assert_eq!(round.scoreboard.score_of(&"bob".to_string()), Some(0.5));
        assert_eq!(fixture.store.result_persists().len(), 1);
    }

    #[tokio::test]
    async fn test_second_report_fails_and_changes_nothing() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);
        fixture
            .processor
            .report_result(fixture.match_id, -1)
            .await
            .unwrap();

        let err = fixture
            .processor
            .report_result(fixture.match_id, 1)
            .await
            .unwrap_err();
        let err = err.downcast::<TournamentError>().unwrap();
        assert!(matches!(err, TournamentError::MatchAlreadyComplete { .. }));

        // State reflects only the first call
        let alice = fixture
            .store
            .load_player(&"alice".to_string())
            .unwrap()
            .unwrap();
        assert!((alice.rating - 1010.0).abs() < 1e-9);
        assert_eq!(fixture.store.result_persists().len(), 1);
        assert_eq!(fixture.sink.delivered().len(), 1);
        assert_eq!(fixture.processor.stats().reports_rejected, 1);
    }

    #[tokio::test]
    async fn test_concurrent_reports_have_one_winner() {
        let fixture = Arc::new(fixture_with_ratings(1000.0, 1000.0));

        let first = {
            let fixture = fixture.clone();
            tokio::spawn(async move { fixture.processor.report_result(fixture.match_id, -1).await })
        };
        let second = {
            let fixture = fixture.clone();
            tokio::spawn(async move { fixture.processor.report_result(fixture.match_id, 1).await })
        };

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let successes = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert_eq!(fixture.store.result_persists().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_match_fails() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);
        let err = fixture
            .processor
            .report_result(crate::utils::generate_match_id(), 0)
            .await
            .unwrap_err();
        let err = err.downcast::<TournamentError>().unwrap();
        assert!(matches!(err, TournamentError::MatchNotFound { .. }));
    }

    #[tokio::test]
    async fn test_illegal_outcome_code_fails() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);
        let err = fixture
            .processor
            .report_result(fixture.match_id, 3)
            .await
            .unwrap_err();
        let err = err.downcast::<TournamentError>().unwrap();
        assert!(matches!(err, TournamentError::InvalidOutcome { code: 3 }));
        assert_eq!(fixture.processor.stats().reports_rejected, 1);
    }

    #[tokio::test]
    async fn test_rating_math_uses_snapshots_not_live_ratings() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);

        // A player's live rating drifts between pairing and scoring
        let mut alice = fixture
            .store
            .load_player(&"alice".to_string())
            .unwrap()
            .unwrap();
        alice.rating = 2000.0;
        fixture.store.save_player(alice).unwrap();

        fixture
            .processor
            .report_result(fixture.match_id, -1)
            .await
            .unwrap();

        // Deltas come from the 1000/1000 snapshot, not the drifted value
        let scored = fixture
            .store
            .load_match(&fixture.match_id)
            .unwrap()
            .unwrap();
        let (delta_one, _) = scored.rating_deltas().unwrap();
        assert!((delta_one - 10.0).abs() < 1e-9);

        let alice = fixture
            .store
            .load_player(&"alice".to_string())
            .unwrap()
            .unwrap();
        assert!((alice.rating - 1010.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_scoreboard_entry_is_conflict_and_nothing_persists() {
        let fixture = fixture_with_ratings(1000.0, 1000.0);

        // Corrupt the round: scoreboard missing bob
        let mut round = fixture
            .store
            .load_round(&fixture.round_id)
            .unwrap()
            .unwrap();
        round.scoreboard = Scoreboard::seeded(["alice".to_string()]);
        fixture.store.save_round(round).unwrap();

        let err = fixture
            .processor
            .report_result(fixture.match_id, 0)
            .await
            .unwrap_err();
        let err = err.downcast::<TournamentError>().unwrap();
        assert!(matches!(
            err,
            TournamentError::PlayerNotInScoreboard { ref player_id } if player_id == "bob"
        ));

        // The failed report applied nothing
        assert_eq!(fixture.store.result_persists().len(), 0);
        let stored = fixture
            .store
            .load_match(&fixture.match_id)
            .unwrap()
            .unwrap();
        assert!(!stored.is_complete());
        let alice = fixture
            .store
            .load_player(&"alice".to_string())
            .unwrap()
            .unwrap();
        assert_eq!(alice.rating, 1000.0);
        assert!(fixture.sink.delivered().is_empty());
    }
}
