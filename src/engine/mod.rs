//! The match-result processing engine
//!
//! This module contains the orchestration layer: result processing, round
//! progression and the tournament lifecycle state machine.

pub mod lifecycle;
pub mod processor;
pub mod progression;

// Re-export commonly used types
pub use lifecycle::TournamentLifecycle;
pub use processor::{MatchResultProcessor, ProcessorStats};
pub use progression::{RoundCompletionSink, RoundProgressionController};
