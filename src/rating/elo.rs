//! Elo rating system implementation
//!
//! This module provides the concrete rating calculator backed by the classic
//! Elo formulas, using the skillratings crate for the logistic expected-score
//! curve.

use crate::error::TournamentError;
use crate::rating::calculator::RatingCalculator;
use crate::types::MatchOutcome;
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};

/// Configuration for the Elo rating system.
///
/// K is selected per player from that player's own rating: the higher factor
/// applies below the master threshold, the lower one at or above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloConfig {
    /// K-factor for ratings below the master threshold
    pub k_factor_standard: f64,
    /// K-factor for ratings at or above the master threshold
    pub k_factor_master: f64,
    /// Rating at which the lower K-factor takes over
    pub master_threshold: f64,
    /// Rating assigned to unrated players
    pub initial_rating: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k_factor_standard: 20.0,
            k_factor_master: 10.0,
            master_threshold: 2400.0,
            initial_rating: 1000.0,
        }
    }
}

impl EloConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.k_factor_standard <= 0.0 || self.k_factor_master <= 0.0 {
            return Err(TournamentError::ConfigurationError {
                message: "K-factors must be positive".to_string(),
            }
            .into());
        }

        if self.master_threshold < 0.0 {
            return Err(TournamentError::ConfigurationError {
                message: "Master threshold must be non-negative".to_string(),
            }
            .into());
        }

        if self.initial_rating < 0.0 {
            return Err(TournamentError::ConfigurationError {
                message: "Initial rating must be non-negative".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: EloConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// K-factor for a single player, chosen from that player's own rating
    pub fn k_factor(&self, rating: f64) -> f64 {
        if rating < self.config.master_threshold {
            self.config.k_factor_standard
        } else {
            self.config.k_factor_master
        }
    }

    /// Probability that `rating` beats `opponent` on the logistic Elo curve.
    /// Symmetric: the two perspectives always sum to 1.0.
    pub fn win_probability(&self, rating: f64, opponent: f64) -> f64 {
        let (probability, _) =
            expected_score(&EloRating { rating }, &EloRating { rating: opponent });
        probability
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn compute_new_ratings(
        &self,
        rating_one: f64,
        rating_two: f64,
        outcome: MatchOutcome,
    ) -> crate::error::Result<(f64, f64)> {
        if rating_one < 0.0 {
            return Err(TournamentError::InvalidRating { rating: rating_one }.into());
        }
        if rating_two < 0.0 {
            return Err(TournamentError::InvalidRating { rating: rating_two }.into());
        }

        let probability_one = self.win_probability(rating_one, rating_two);
        let probability_two = self.win_probability(rating_two, rating_one);

        let new_one =
            rating_one + self.k_factor(rating_one) * (outcome.win_value_one() - probability_one);
        let new_two =
            rating_two + self.k_factor(rating_two) * (outcome.win_value_two() - probability_two);

        Ok((new_one, new_two))
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }
}
