//! Rating calculations for match results
//!
//! This module defines the rating calculator interface and the Elo
//! implementation used to settle completed matches.

pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use calculator::RatingCalculator;
pub use elo::{EloConfig, EloRatingCalculator};
