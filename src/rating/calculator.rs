//! Rating calculator trait and test support
//!
//! This module defines the interface for rating calculations; the concrete
//! Elo implementation lives in [`crate::rating::elo`].

use crate::types::MatchOutcome;

/// Trait for computing post-match ratings.
///
/// Implementations must be pure and stateless: identical inputs always
/// produce identical outputs, so a match can be replayed deterministically.
pub trait RatingCalculator: Send + Sync {
    /// Compute both players' new ratings from their pre-match ratings and the
    /// shared outcome.
    ///
    /// # Arguments
    /// * `rating_one` - player one's rating at match start
    /// * `rating_two` - player two's rating at match start
    /// * `outcome` - the reported result, applied from each side's perspective
    ///
    /// # Returns
    /// `(new_rating_one, new_rating_two)`, fractional and unrounded
    fn compute_new_ratings(
        &self,
        rating_one: f64,
        rating_two: f64,
        outcome: MatchOutcome,
    ) -> crate::error::Result<(f64, f64)>;

    /// Rating assigned to players who have never been rated
    fn initial_rating(&self) -> f64;
}

/// Mock rating calculator for testing
#[derive(Debug, Default)]
pub struct MockRatingCalculator {
    calculation_calls: std::sync::Mutex<Vec<(f64, f64, MatchOutcome)>>,
    fixed_result: std::sync::RwLock<Option<(f64, f64)>>,
}

impl MockRatingCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed result to return for all calculations
    pub fn set_fixed_result(&self, result: (f64, f64)) {
        if let Ok(mut fixed) = self.fixed_result.write() {
            *fixed = Some(result);
        }
    }

    /// Get all calculation calls made (for testing)
    pub fn get_calculation_calls(&self) -> Vec<(f64, f64, MatchOutcome)> {
        self.calculation_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RatingCalculator for MockRatingCalculator {
    fn compute_new_ratings(
        &self,
        rating_one: f64,
        rating_two: f64,
        outcome: MatchOutcome,
    ) -> crate::error::Result<(f64, f64)> {
        if let Ok(mut calls) = self.calculation_calls.lock() {
            calls.push((rating_one, rating_two, outcome));
        }

        if let Ok(fixed) = self.fixed_result.read() {
            if let Some(result) = *fixed {
                return Ok(result);
            }
        }

        // Default behavior: no rating change
        Ok((rating_one, rating_two))
    }

    fn initial_rating(&self) -> f64 {
        1000.0
    }
}
