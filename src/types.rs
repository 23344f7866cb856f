//! Common types used throughout the standings engine

use crate::error::{Result, TournamentError};
use crate::standings::scoreboard::Scoreboard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Unique identifier for rounds
pub type RoundId = Uuid;

/// Unique identifier for tournaments
pub type TournamentId = Uuid;

/// Tri-state result of a match, reported as a small signed code:
/// -1 player one wins, 0 draw, 1 player two wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    PlayerOneWin,
    Draw,
    PlayerTwoWin,
}

impl MatchOutcome {
    /// Parse the wire code; any value outside {-1, 0, 1} is rejected
    pub fn from_code(code: i8) -> Result<Self> {
        match code {
            -1 => Ok(MatchOutcome::PlayerOneWin),
            0 => Ok(MatchOutcome::Draw),
            1 => Ok(MatchOutcome::PlayerTwoWin),
            other => Err(TournamentError::InvalidOutcome { code: other }.into()),
        }
    }

    pub fn code(&self) -> i8 {
        match self {
            MatchOutcome::PlayerOneWin => -1,
            MatchOutcome::Draw => 0,
            MatchOutcome::PlayerTwoWin => 1,
        }
    }

    /// Score value from player one's perspective: 1.0 win, 0.5 draw, 0.0 loss
    pub fn win_value_one(&self) -> f64 {
        match self {
            MatchOutcome::PlayerOneWin => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::PlayerTwoWin => 0.0,
        }
    }

    /// Score value from player two's perspective
    pub fn win_value_two(&self) -> f64 {
        1.0 - self.win_value_one()
    }
}

/// A rated tournament participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub rating: f64,
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, rating: f64) -> Self {
        Self {
            id: id.into(),
            rating,
            registered_at: crate::utils::current_timestamp(),
        }
    }
}

/// Single pairing record within a round.
///
/// Starting ratings are a snapshot captured at pairing time; delta math never
/// reads the players' live ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    round_id: RoundId,
    player_one: PlayerId,
    player_two: PlayerId,
    player_one_start_rating: f64,
    player_two_start_rating: f64,
    complete: bool,
    outcome: Option<MatchOutcome>,
    rating_delta_one: Option<f64>,
    rating_delta_two: Option<f64>,
}

impl Match {
    /// Create a pending match, snapshotting both players' current ratings
    pub fn new(round_id: RoundId, player_one: &Player, player_two: &Player) -> Self {
        Self {
            id: crate::utils::generate_match_id(),
            round_id,
            player_one: player_one.id.clone(),
            player_two: player_two.id.clone(),
            player_one_start_rating: player_one.rating,
            player_two_start_rating: player_two.rating,
            complete: false,
            outcome: None,
            rating_delta_one: None,
            rating_delta_two: None,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn player_one(&self) -> &PlayerId {
        &self.player_one
    }

    pub fn player_two(&self) -> &PlayerId {
        &self.player_two
    }

    pub fn player_one_start_rating(&self) -> f64 {
        self.player_one_start_rating
    }

    pub fn player_two_start_rating(&self) -> f64 {
        self.player_two_start_rating
    }

    /// Single point of truth for "has this match been scored"
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Rating deltas (player one, player two); None until complete
    pub fn rating_deltas(&self) -> Option<(f64, f64)> {
        self.rating_delta_one.zip(self.rating_delta_two)
    }

    /// Transition pending -> complete. Terminal: a second call fails and the
    /// stored outcome and deltas stay untouched.
    pub fn complete(
        &mut self,
        outcome: MatchOutcome,
        rating_delta_one: f64,
        rating_delta_two: f64,
    ) -> Result<()> {
        if self.complete {
            return Err(TournamentError::MatchAlreadyComplete {
                match_id: self.id.to_string(),
            }
            .into());
        }

        self.outcome = Some(outcome);
        self.rating_delta_one = Some(rating_delta_one);
        self.rating_delta_two = Some(rating_delta_two);
        self.complete = true;
        Ok(())
    }

    /// Whether the given player takes part in this match
    pub fn involves(&self, player_id: &PlayerId) -> bool {
        &self.player_one == player_id || &self.player_two == player_id
    }
}

/// One round of a tournament: its scoreboard plus the matches paired for it.
/// Created complete-in-structure; finished once every match is complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    /// 1-based round number within the tournament
    pub number: u32,
    pub scoreboard: Scoreboard,
    pub match_ids: Vec<MatchId>,
}

impl Round {
    pub fn new(tournament_id: TournamentId, number: u32, scoreboard: Scoreboard) -> Self {
        Self {
            id: crate::utils::generate_round_id(),
            tournament_id,
            number,
            scoreboard,
            match_ids: Vec::new(),
        }
    }
}

/// Lifecycle status of a tournament; transitions are monotonic
/// (Setup -> Ongoing -> Completed, never backward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TournamentStatus {
    Setup,
    Ongoing,
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Setup => write!(f, "setup"),
            TournamentStatus::Ongoing => write!(f, "ongoing"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A tournament and its configuration.
///
/// The participant count is always derived from the participant list; there
/// is no separately maintained size counter to drift out of sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Configured player count; must be even
    pub size: usize,
    pub no_of_rounds: u32,
    /// 0 while in setup, then the number of the latest round
    pub current_round: u32,
    pub status: TournamentStatus,
    pub round_ids: Vec<RoundId>,
    pub participants: Vec<PlayerId>,
}

impl Tournament {
    pub fn new(name: impl Into<String>, size: usize, no_of_rounds: u32) -> Self {
        Self {
            id: crate::utils::generate_tournament_id(),
            name: name.into(),
            size,
            no_of_rounds,
            current_round: 0,
            status: TournamentStatus::Setup,
            round_ids: Vec::new(),
            participants: Vec::new(),
        }
    }

    /// Number of registered participants, derived from the relation
    pub fn player_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_full(&self) -> bool {
        self.player_count() >= self.size
    }

    pub fn has_participant(&self, player_id: &PlayerId) -> bool {
        self.participants.iter().any(|p| p == player_id)
    }
}
