use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ScoringError;
use super::factors::{log_odds, sigmoid};

/// Formula family used to combine peer ratings into aggregate standings.
///
/// Only `Bijunction` has a concrete formula. The other variants are
/// accepted in configuration so that selecting them fails loudly with
/// [`ScoringError::UnimplementedMode`] instead of being rejected as an
/// unknown value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinationMode {
    #[default]
    Bijunction,
    Conjunction,
    Disjunction,
}

impl CombinationMode {
    /// Resolve the mode to its combination strategy.
    pub fn combiner(self) -> Result<&'static dyn RatingCombiner, ScoringError> {
        match self {
            CombinationMode::Bijunction => Ok(&Bijunction),
            CombinationMode::Conjunction | CombinationMode::Disjunction => {
                Err(ScoringError::UnimplementedMode(self))
            }
        }
    }
}

impl fmt::Display for CombinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CombinationMode::Bijunction => "bijunction",
            CombinationMode::Conjunction => "conjunction",
            CombinationMode::Disjunction => "disjunction",
        };
        f.write_str(name)
    }
}

/// Aggregate standings produced by a [`RatingCombiner`].
///
/// Ratings are kept alongside their log-odds so downstream steps can work
/// in whichever space is numerically convenient.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRatings {
    pub student_ratings: Vec<f64>,
    pub student_log_odds: Vec<f64>,
    pub mean_rating: f64,
    pub mean_log_odds: f64,
}

/// Strategy combining a normalized peer-rating matrix and rater weights
/// into one standing per student plus a group-wide mean standing.
///
/// Implementations may assume the matrix is square, every entry lies in
/// (0, 1), and `weights.len()` equals the group size.
pub trait RatingCombiner: Sync {
    fn aggregate(&self, normalized: &[Vec<f64>], weights: &[f64]) -> AggregateRatings;
}

/// Weighted odds-ratio combination.
///
/// Each rating is compared against the rater's own self-rating as an odds
/// ratio, raised to the rater's weight, and the weighted odds ratios are
/// multiplied together. The group mean combines the per-student odds the
/// same way with each student's weight. Work happens in log-odds space,
/// where the products become weighted sums.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bijunction;

impl RatingCombiner for Bijunction {
    fn aggregate(&self, normalized: &[Vec<f64>], weights: &[f64]) -> AggregateRatings {
        let self_log_odds: Vec<f64> = normalized
            .iter()
            .enumerate()
            .map(|(j, row)| log_odds(row[j]))
            .collect();

        let student_log_odds: Vec<f64> = normalized
            .iter()
            .map(|row| {
                row.iter()
                    .zip(self_log_odds.iter())
                    .zip(weights.iter())
                    .map(|((&peer, &own), &w)| w * (log_odds(peer) - own))
                    .sum()
            })
            .collect();

        let mean_log_odds: f64 = student_log_odds
            .iter()
            .zip(weights.iter())
            .map(|(lo, w)| w * lo)
            .sum();

        AggregateRatings {
            student_ratings: student_log_odds.iter().map(|&lo| sigmoid(lo)).collect(),
            student_log_odds,
            mean_rating: sigmoid(mean_log_odds),
            mean_log_odds,
        }
    }
}
