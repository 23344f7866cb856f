//! Crosstable - match-result processing and standings engine
//!
//! This crate scores reported match outcomes for round-based tournaments:
//! Elo rating updates, deterministic per-round scoreboards, and lifecycle
//! progression from setup through the final round.

pub mod config;
pub mod engine;
pub mod error;
pub mod pairing;
pub mod rating;
pub mod roster;
pub mod standings;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{ErrorKind, Result, TournamentError};
pub use types::*;

// Re-export key components
pub use engine::{
    MatchResultProcessor, RoundCompletionSink, RoundProgressionController, TournamentLifecycle,
};
pub use pairing::{PairingProvider, StandingsPairingProvider};
pub use store::{InMemoryStore, TournamentStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
