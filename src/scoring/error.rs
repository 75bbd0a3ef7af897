use thiserror::Error;

use super::mode::CombinationMode;

/// Errors raised by the scoring engines.
///
/// Every check the engines perform maps to exactly one of these kinds.
/// Identical inputs always reproduce the identical error, so callers
/// should report rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Non-square matrix, empty group, or a weight vector whose length
    /// does not match the group size / component count.
    #[error("input shape error: {0}")]
    InputShape(String),

    /// The combination mode has no formula.
    #[error("combination mode '{0}' is not implemented")]
    UnimplementedMode(CombinationMode),

    /// A value lies outside the domain the formulas are defined on.
    #[error("domain range error: {0}")]
    DomainRange(String),

    /// The split-join consistency check failed.
    #[error(
        "split-join invariance violated ({check}): expected {expected}, got {actual} (tolerance {tolerance})"
    )]
    InvariantViolation {
        check: &'static str,
        expected: f64,
        actual: f64,
        tolerance: f64,
    },
}

impl ScoringError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        ScoringError::InputShape(msg.into())
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        ScoringError::DomainRange(msg.into())
    }
}
