//! Split-join consistency of a scored group.
//!
//! Joining the individual contributions with the rater weights and pushing
//! the joined contribution through the score distributor must land on the
//! group product score: splitting a grade among members and joining it back
//! is lossless.

use super::config::InvariantTolerance;
use super::error::ScoringError;
use super::factors::{distribute_score, join_half_log_odds};
use super::observer::ScoringObserver;

/// Group-level quantities computed while checking the invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitJoin {
    /// Weighted generalized mean of the individual contributions
    pub mean_contribution: f64,
    /// Score the distributor assigns to `mean_contribution`
    pub joined_score: f64,
    /// Arithmetic mean of the individual scores
    pub average_score: f64,
}

/// Check the split-join invariance of one scored group.
///
/// Contributions are passed as their half log-odds (see
/// [`contribution_half_log_odds`](super::factors::contribution_half_log_odds))
/// so contributions close to -1 or 1 join without loss.
///
/// Tolerances scale with the magnitude of the group product score once it
/// exceeds 1, so a 0-100 grade and a 0-1 grade are held to the same
/// relative precision.
pub fn check_split_join(
    half_log_odds: &[f64],
    scores: &[f64],
    weights: &[f64],
    group_product_score: f64,
    group_spread: f64,
    tolerance: &InvariantTolerance,
    observer: &mut dyn ScoringObserver,
) -> Result<SplitJoin, ScoringError> {
    let mean_contribution = join_half_log_odds(half_log_odds, weights);
    let joined_score = distribute_score(group_product_score, group_spread, mean_contribution);
    let average_score = scores.iter().sum::<f64>() / scores.len() as f64;

    let scale = group_product_score.abs().max(1.0);

    ensure_close(
        "join",
        group_product_score,
        joined_score,
        tolerance.join * scale,
        observer,
    )?;

    if let Some(avg_tolerance) = tolerance.average {
        ensure_close(
            "average",
            joined_score,
            average_score,
            avg_tolerance * scale,
            observer,
        )?;
    }

    Ok(SplitJoin {
        mean_contribution,
        joined_score,
        average_score,
    })
}

fn ensure_close(
    check: &'static str,
    expected: f64,
    actual: f64,
    tolerance: f64,
    observer: &mut dyn ScoringObserver,
) -> Result<(), ScoringError> {
    // Written so that NaN on either side fails the check
    if (expected - actual).abs() <= tolerance {
        observer.invariant(check, expected, actual);
        Ok(())
    } else {
        Err(ScoringError::InvariantViolation {
            check,
            expected,
            actual,
            tolerance,
        })
    }
}
