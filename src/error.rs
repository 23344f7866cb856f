//! Error types for the tournament standings engine
//!
//! This module defines all error types using anyhow for consistent error
//! handling throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Broad classification of a failure, used by callers to decide whether a
/// retry is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced entity does not exist
    NotFound,
    /// The operation is not legal in the entity's current state
    InvalidState,
    /// The caller supplied an illegal value
    InvalidInput,
    /// Stored data is inconsistent with the requested operation
    Conflict,
    /// An I/O-level failure that may succeed on retry
    Transient,
}

/// Custom error types for specific tournament scenarios
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Round not found: {round_id}")]
    RoundNotFound { round_id: String },

    #[error("Tournament not found: {tournament_id}")]
    TournamentNotFound { tournament_id: String },

    #[error("Match already complete, cannot update again: {match_id}")]
    MatchAlreadyComplete { match_id: String },

    #[error("Tournament {tournament_id} is {status}, expected {expected}")]
    InvalidTournamentStatus {
        tournament_id: String,
        status: String,
        expected: String,
    },

    #[error("Tournament {tournament_id} has {registered} of {required} required players")]
    RosterIncomplete {
        tournament_id: String,
        registered: usize,
        required: usize,
    },

    #[error("Tournament is full: {tournament_id}")]
    TournamentFull { tournament_id: String },

    #[error("Invalid match result {code}: only -1 (player one wins), 0 (draw) and 1 (player two wins) are accepted")]
    InvalidOutcome { code: i8 },

    #[error("Invalid rating value: {rating}")]
    InvalidRating { rating: f64 },

    #[error("Invalid tournament configuration: {reason}")]
    InvalidTournamentConfig { reason: String },

    #[error("Player not found in scoreboard: {player_id}")]
    PlayerNotInScoreboard { player_id: String },

    #[error("Player {player_id} already registered for tournament {tournament_id}")]
    DuplicateRegistration {
        player_id: String,
        tournament_id: String,
    },

    #[error("Player {player_id} is not registered for tournament {tournament_id}")]
    NotRegistered {
        player_id: String,
        tournament_id: String,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Transient failure: {message}")]
    TransientFailure { message: String },
}

impl TournamentError {
    /// Classify this error for retry decisions
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::MatchNotFound { .. }
            | TournamentError::PlayerNotFound { .. }
            | TournamentError::RoundNotFound { .. }
            | TournamentError::TournamentNotFound { .. } => ErrorKind::NotFound,

            TournamentError::MatchAlreadyComplete { .. }
            | TournamentError::InvalidTournamentStatus { .. }
            | TournamentError::RosterIncomplete { .. }
            | TournamentError::TournamentFull { .. } => ErrorKind::InvalidState,

            TournamentError::InvalidOutcome { .. }
            | TournamentError::InvalidRating { .. }
            | TournamentError::InvalidTournamentConfig { .. }
            | TournamentError::ConfigurationError { .. } => ErrorKind::InvalidInput,

            TournamentError::PlayerNotInScoreboard { .. }
            | TournamentError::DuplicateRegistration { .. }
            | TournamentError::NotRegistered { .. } => ErrorKind::Conflict,

            TournamentError::TransientFailure { .. } => ErrorKind::Transient,
        }
    }

    /// Whether a caller may retry the failed operation with backoff.
    /// Only transient failures qualify; everything else signals a caller or
    /// data-integrity problem that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
