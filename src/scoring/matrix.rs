use super::error::ScoringError;

/// Check that `matrix` is a non-empty square grid and return its size.
pub fn group_size(matrix: &[Vec<f64>]) -> Result<usize, ScoringError> {
    let n = matrix.len();
    if n == 0 {
        return Err(ScoringError::shape(
            "invalid peer rating matrix: the group has no students",
        ));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(ScoringError::shape(format!(
                "invalid peer rating matrix: row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
    }
    Ok(n)
}

/// Check a weight vector against the size it must have.
///
/// `label` names the vector in error messages (e.g. "peer rating weights").
pub fn check_weights(weights: &[f64], expected: usize, label: &str) -> Result<(), ScoringError> {
    if weights.len() != expected {
        return Err(ScoringError::shape(format!(
            "{} has {} entries but {} were expected",
            label,
            weights.len(),
            expected
        )));
    }
    for (i, &w) in weights.iter().enumerate() {
        if !w.is_finite() || w < 0.0 {
            return Err(ScoringError::domain(format!(
                "{}[{}] = {} must be a finite non-negative number",
                label, i, w
            )));
        }
    }
    Ok(())
}

/// Check that every rating lies strictly inside (0, 1).
///
/// The odds ratios of the QASS model divide by `p` and `1 - p`, so the
/// boundary values are rejected up front instead of propagating infinities.
pub fn check_open_unit(matrix: &[Vec<f64>]) -> Result<(), ScoringError> {
    for (i, row) in matrix.iter().enumerate() {
        for (j, &rating) in row.iter().enumerate() {
            if !(rating > 0.0 && rating < 1.0) {
                return Err(ScoringError::domain(format!(
                    "rating {} at [{}][{}] is outside the open interval (0, 1)",
                    rating, i, j
                )));
            }
        }
    }
    Ok(())
}

/// Check that every rating is finite and non-negative.
pub fn check_non_negative(matrix: &[Vec<f64>]) -> Result<(), ScoringError> {
    for (i, row) in matrix.iter().enumerate() {
        for (j, &rating) in row.iter().enumerate() {
            if !rating.is_finite() || rating < 0.0 {
                return Err(ScoringError::domain(format!(
                    "rating {} at [{}][{}] must be a finite non-negative number",
                    rating, i, j
                )));
            }
        }
    }
    Ok(())
}
