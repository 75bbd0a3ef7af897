//! Scalar building blocks of the QASS model.

/// Rescale a raw rating to counter rater leniency or severity.
///
/// Identity at `tuning_factor = 0`, full inversion (`1 - rating`) at 1.
pub fn rescale(tuning_factor: f64, rating: f64) -> f64 {
    (1.0 - tuning_factor) * rating + tuning_factor * (1.0 - rating)
}

/// Natural log of the odds `p / (1 - p)`.
pub fn log_odds(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Inverse of [`log_odds`]: `odds / (1 + odds)` for `odds = e^x`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Signed contribution of a student relative to the group.
///
/// `value = (odds(student) / odds(mean))^impact`,
/// `contribution = (value - 1) / (value + 1)`.
pub fn contribution(student_rating: f64, mean_rating: f64, impact: f64) -> f64 {
    contribution_from_log_odds(log_odds(student_rating), log_odds(mean_rating), impact)
}

/// [`contribution`] with both standings already in log-odds space.
///
/// `(e^x - 1) / (e^x + 1)` is `tanh(x / 2)`, which stays finite for any
/// finite `x`.
pub fn contribution_from_log_odds(student_log_odds: f64, mean_log_odds: f64, impact: f64) -> f64 {
    contribution_half_log_odds(student_log_odds, mean_log_odds, impact).tanh()
}

/// The value whose `tanh` is the contribution: half the log of the
/// contribution odds `(1 + c) / (1 - c)`.
///
/// Unlike the contribution itself it keeps full precision when the
/// contribution is close to -1 or 1.
pub fn contribution_half_log_odds(student_log_odds: f64, mean_log_odds: f64, impact: f64) -> f64 {
    impact * (student_log_odds - mean_log_odds) / 2.0
}

/// Map a contribution onto the group product score.
///
/// `score = group_product_score ^ (group_spread ^ contribution)`
pub fn distribute_score(group_product_score: f64, group_spread: f64, contribution: f64) -> f64 {
    group_product_score.powf(group_spread.powf(contribution))
}

/// Weighted generalized mean of contributions.
///
/// Each contribution is mapped to odds `(1 + c) / (1 - c)`, the odds are
/// combined as a weighted product, and the result is mapped back with
/// `(x - 1) / (x + 1)`. Used both to join the contributions of a group
/// (rater weights) and to merge a student's per-period contributions
/// (component weights).
///
/// Contributions must lie strictly inside (-1, 1) and `weights` must be
/// as long as `contributions`.
pub fn combine_contributions(contributions: &[f64], weights: &[f64]) -> f64 {
    let half_log_odds: Vec<f64> = contributions.iter().map(|c| c.atanh()).collect();
    join_half_log_odds(&half_log_odds, weights)
}

/// [`combine_contributions`] for contributions given as
/// [`contribution_half_log_odds`] values.
pub fn join_half_log_odds(half_log_odds: &[f64], weights: &[f64]) -> f64 {
    half_log_odds
        .iter()
        .zip(weights.iter())
        .map(|(&x, &w)| w * x)
        .sum::<f64>()
        .tanh()
}
