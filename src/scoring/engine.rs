use serde::Serialize;

use super::config::QassParams;
use super::error::ScoringError;
use super::factors::{contribution_half_log_odds, distribute_score, join_half_log_odds, rescale};
use super::invariant::check_split_join;
use super::matrix::{check_open_unit, check_weights, group_size};
use super::mode::RatingCombiner;
use super::observer::{NoopObserver, ScoringObserver};
use super::validation::{group_score_error, qass_scalar_errors};

/// Outcome of a single-component QASS run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QassResult {
    /// Individual score per student, in input order
    pub scores: Vec<f64>,
    /// Contribution per student, each in (-1, 1)
    pub contributions: Vec<f64>,
    /// Arithmetic mean of `scores`
    pub mean_score: f64,
    /// Contributions joined with the rater weights
    pub mean_contribution: f64,
    /// Group product score rebuilt from `mean_contribution`
    pub joined_score: f64,
}

/// Score one group from a single peer-rating matrix.
///
/// `matrix[i][j]` is the rating student `i` gave student `j`; every entry
/// must lie strictly inside (0, 1). `rater_weights` must have one entry
/// per student and is used as given (callers normalize it).
pub fn compute_qass(
    matrix: &[Vec<f64>],
    rater_weights: &[f64],
    params: &QassParams,
    group_product_score: f64,
) -> Result<QassResult, ScoringError> {
    compute_qass_observed(
        matrix,
        rater_weights,
        params,
        group_product_score,
        &mut NoopObserver,
    )
}

/// [`compute_qass`] reporting intermediate values to `observer`.
pub fn compute_qass_observed(
    matrix: &[Vec<f64>],
    rater_weights: &[f64],
    params: &QassParams,
    group_product_score: f64,
    observer: &mut dyn ScoringObserver,
) -> Result<QassResult, ScoringError> {
    let n = group_size(matrix)?;
    check_weights(rater_weights, n, "peer rating weights")?;
    check_open_unit(matrix)?;
    check_scalars(params, group_product_score)?;
    let combiner = params.mode.combiner()?;

    let component = component_contributions(0, matrix, rater_weights, params, combiner, observer)?;
    observer.merged(&component.contributions);

    let scores = distribute_all(&component.contributions, params, group_product_score)?;

    let split_join = check_split_join(
        &component.half_log_odds,
        &scores,
        rater_weights,
        group_product_score,
        params.group_spread,
        &params.invariant,
        observer,
    )?;
    if !split_join.average_score.is_finite() {
        return Err(ScoringError::domain(format!(
            "mean score {} is not finite; group_spread {} is too large for group score {}",
            split_join.average_score, params.group_spread, group_product_score
        )));
    }

    Ok(QassResult {
        scores,
        contributions: component.contributions,
        mean_score: split_join.average_score,
        mean_contribution: split_join.mean_contribution,
        joined_score: split_join.joined_score,
    })
}

/// Score one group across several scoring periods.
///
/// Each matrix is one period, all over the same students. Per-period
/// contributions are merged per student with `component_weights` before a
/// single pass through the score distributor. Only the final scores are
/// returned; per-period contributions are available through
/// [`compute_qass_multi_component_observed`].
pub fn compute_qass_multi_component(
    matrices: &[Vec<Vec<f64>>],
    rater_weights: &[f64],
    component_weights: &[f64],
    params: &QassParams,
    group_product_score: f64,
) -> Result<Vec<f64>, ScoringError> {
    compute_qass_multi_component_observed(
        matrices,
        rater_weights,
        component_weights,
        params,
        group_product_score,
        &mut NoopObserver,
    )
}

/// [`compute_qass_multi_component`] reporting intermediate values to `observer`.
pub fn compute_qass_multi_component_observed(
    matrices: &[Vec<Vec<f64>>],
    rater_weights: &[f64],
    component_weights: &[f64],
    params: &QassParams,
    group_product_score: f64,
    observer: &mut dyn ScoringObserver,
) -> Result<Vec<f64>, ScoringError> {
    let first = matrices.first().ok_or_else(|| {
        ScoringError::shape("at least one peer rating matrix is required")
    })?;
    check_weights(component_weights, matrices.len(), "scoring component weights")?;

    let n = group_size(first)?;
    for (k, matrix) in matrices.iter().enumerate() {
        let size = group_size(matrix)?;
        if size != n {
            return Err(ScoringError::shape(format!(
                "peer rating matrix {} covers {} students, expected {}",
                k, size, n
            )));
        }
    }
    check_weights(rater_weights, n, "peer rating weights")?;
    for matrix in matrices {
        check_open_unit(matrix)?;
    }
    check_scalars(params, group_product_score)?;
    let combiner = params.mode.combiner()?;

    // per_student[i][k] = half log-odds of student i's contribution in period k
    let mut per_student = vec![Vec::with_capacity(matrices.len()); n];
    for (k, matrix) in matrices.iter().enumerate() {
        let component =
            component_contributions(k, matrix, rater_weights, params, combiner, observer)?;
        for (i, x) in component.half_log_odds.into_iter().enumerate() {
            per_student[i].push(x);
        }
    }

    let merged: Vec<f64> = per_student
        .iter()
        .map(|periods| join_half_log_odds(periods, component_weights))
        .collect();
    ensure_open(&merged)?;
    observer.merged(&merged);

    distribute_all(&merged, params, group_product_score)
}

/// Contributions of one component, with the half log-odds they were
/// computed from.
struct ComponentContributions {
    contributions: Vec<f64>,
    half_log_odds: Vec<f64>,
}

/// Rescale, aggregate and turn one matrix into contributions.
fn component_contributions(
    component: usize,
    matrix: &[Vec<f64>],
    rater_weights: &[f64],
    params: &QassParams,
    combiner: &dyn RatingCombiner,
    observer: &mut dyn ScoringObserver,
) -> Result<ComponentContributions, ScoringError> {
    let normalized: Vec<Vec<f64>> = matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&rating| rescale(params.tuning_factor, rating))
                .collect()
        })
        .collect();
    observer.rescaled(component, &normalized);

    let aggregate = combiner.aggregate(&normalized, rater_weights);
    observer.ratings(component, &aggregate.student_ratings, aggregate.mean_rating);

    let half_log_odds: Vec<f64> = aggregate
        .student_log_odds
        .iter()
        .map(|&lo| contribution_half_log_odds(lo, aggregate.mean_log_odds, params.peer_rating_impact))
        .collect();
    let contributions: Vec<f64> = half_log_odds.iter().map(|x| x.tanh()).collect();
    ensure_open(&contributions)?;
    observer.contributions(component, &contributions);

    Ok(ComponentContributions {
        contributions,
        half_log_odds,
    })
}

/// Score every student, rejecting scores that overflow.
fn distribute_all(
    contributions: &[f64],
    params: &QassParams,
    group_product_score: f64,
) -> Result<Vec<f64>, ScoringError> {
    contributions
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let score = distribute_score(group_product_score, params.group_spread, c);
            if score.is_finite() {
                Ok(score)
            } else {
                Err(ScoringError::domain(format!(
                    "score of student {} is {}; group_spread {} is too large for group score {}",
                    i, score, params.group_spread, group_product_score
                )))
            }
        })
        .collect()
}

fn check_scalars(params: &QassParams, group_product_score: f64) -> Result<(), ScoringError> {
    let mut errors = qass_scalar_errors(params);
    if let Some(e) = group_score_error(group_product_score) {
        errors.push(e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ScoringError::DomainRange(errors.join("; ")))
    }
}

/// Contributions must stay strictly inside (-1, 1). Extreme ratings combined
/// with a large impact can round a contribution onto the boundary, where the
/// odds it stands for become infinite.
fn ensure_open(contributions: &[f64]) -> Result<(), ScoringError> {
    for (i, &c) in contributions.iter().enumerate() {
        if !(c > -1.0 && c < 1.0) {
            return Err(ScoringError::domain(format!(
                "contribution of student {} saturated at {}; ratings are too extreme for the chosen peer_rating_impact",
                i, c
            )));
        }
    }
    Ok(())
}
