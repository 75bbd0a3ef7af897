//! Webavalia: weighted self/peer averaging scaled against the best student.

use serde::Serialize;

use super::config::WebavaliaParams;
use super::error::ScoringError;
use super::matrix::{check_non_negative, group_size};
use super::validation::{group_score_error, webavalia_scalar_errors};

/// Outcome of a Webavalia run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebavaliaResult {
    /// Final score per student, in input order
    pub scores: Vec<f64>,
    /// Weighted self/peer rating per student
    pub ratings: Vec<f64>,
    /// Arithmetic mean of `scores`
    pub mean_score: f64,
}

/// Score one group with the Webavalia model.
///
/// Row `i` holds the ratings that make up student `i`'s score, with
/// `matrix[i][i]` the self rating. Ratings may use any non-negative scale.
/// The best-rated student receives exactly `group_score`; everyone else
/// receives `group_score * sqrt(rating / best)`.
pub fn compute_webavalia(
    matrix: &[Vec<f64>],
    group_score: f64,
    params: &WebavaliaParams,
) -> Result<WebavaliaResult, ScoringError> {
    let n = group_size(matrix)?;
    check_non_negative(matrix)?;

    let mut errors = webavalia_scalar_errors(params);
    if let Some(e) = group_score_error(group_score) {
        errors.push(e);
    }
    if !errors.is_empty() {
        return Err(ScoringError::DomainRange(errors.join("; ")));
    }

    let denominator = params.self_weight + params.peer_weight * (n - 1) as f64;
    if denominator <= 0.0 {
        // Only reachable for a single student rated with peer weight alone
        return Err(ScoringError::domain(format!(
            "a group of {} with self_weight {} has no ratings to average",
            n, params.self_weight
        )));
    }

    let ratings: Vec<f64> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let self_rating = row[i];
            let sum_others: f64 = row
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, r)| r)
                .sum();
            (params.self_weight * self_rating + params.peer_weight * sum_others) / denominator
        })
        .collect();

    let max_rating = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_rating <= 0.0 {
        return Err(ScoringError::domain(
            "every student has a rating of zero; there is no best rating to scale against",
        ));
    }

    let scores: Vec<f64> = ratings
        .iter()
        .map(|r| group_score * (r / max_rating).sqrt())
        .collect();
    let mean_score = scores.iter().sum::<f64>() / n as f64;

    Ok(WebavaliaResult {
        scores,
        ratings,
        mean_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_weights() -> WebavaliaParams {
        WebavaliaParams {
            self_weight: 1.0,
            peer_weight: 1.0,
        }
    }

    #[test]
    fn test_two_student_example() {
        let matrix = vec![vec![10.0, 8.0], vec![9.0, 10.0]];
        let result = compute_webavalia(&matrix, 100.0, &equal_weights()).unwrap();

        assert_eq!(result.ratings, vec![9.0, 9.5]);
        assert!((result.scores[0] - 97.332).abs() < 0.01);
        assert_eq!(result.scores[1], 100.0);
        assert!((result.mean_score - (result.scores[0] + 100.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_best_student_gets_group_score() {
        let matrix = vec![
            vec![4.0, 3.0, 2.0],
            vec![5.0, 5.0, 1.0],
            vec![3.0, 3.0, 3.0],
        ];
        let result = compute_webavalia(&matrix, 18.0, &equal_weights()).unwrap();
        let best = result.scores.iter().copied().fold(0.0, f64::max);
        assert_eq!(best, 18.0);
        for s in &result.scores {
            assert!(*s <= 18.0 && *s > 0.0);
        }
    }

    #[test]
    fn test_self_weight_shifts_rating() {
        let matrix = vec![vec![10.0, 2.0], vec![2.0, 10.0]];
        let params = WebavaliaParams {
            self_weight: 3.0,
            peer_weight: 1.0,
        };
        let result = compute_webavalia(&matrix, 20.0, &params).unwrap();
        // (3 * 10 + 2) / (3 + 1)
        assert_eq!(result.ratings[0], 8.0);
    }

    #[test]
    fn test_peer_only_ignores_self_rating() {
        let matrix = vec![
            vec![100.0, 6.0, 4.0],
            vec![4.0, 0.0, 4.0],
            vec![8.0, 8.0, 0.0],
        ];
        let params = WebavaliaParams {
            self_weight: 0.0,
            peer_weight: 1.0,
        };
        let result = compute_webavalia(&matrix, 10.0, &params).unwrap();
        assert_eq!(result.ratings, vec![5.0, 4.0, 8.0]);
    }

    #[test]
    fn test_single_student_self_only() {
        let result = compute_webavalia(&[vec![7.0]], 15.0, &equal_weights()).unwrap();
        assert_eq!(result.ratings, vec![7.0]);
        assert_eq!(result.scores, vec![15.0]);
    }

    #[test]
    fn test_single_student_peer_only_is_guarded() {
        let params = WebavaliaParams {
            self_weight: 0.0,
            peer_weight: 1.0,
        };
        let err = compute_webavalia(&[vec![7.0]], 15.0, &params).unwrap_err();
        assert!(matches!(err, ScoringError::DomainRange(_)));
    }

    #[test]
    fn test_all_zero_ratings_guarded() {
        let err = compute_webavalia(&[vec![0.0, 0.0], vec![0.0, 0.0]], 15.0, &equal_weights())
            .unwrap_err();
        assert!(matches!(err, ScoringError::DomainRange(_)));
    }

    #[test]
    fn test_non_square_matrix() {
        let err = compute_webavalia(&[vec![1.0, 2.0]], 15.0, &equal_weights()).unwrap_err();
        assert!(matches!(err, ScoringError::InputShape(_)));
        assert!(err.to_string().contains("invalid peer rating matrix"));
    }

    #[test]
    fn test_negative_rating_rejected() {
        let err = compute_webavalia(&[vec![1.0, -2.0], vec![1.0, 1.0]], 15.0, &equal_weights())
            .unwrap_err();
        assert!(matches!(err, ScoringError::DomainRange(_)));
    }

    #[test]
    fn test_both_weights_zero_rejected() {
        let params = WebavaliaParams {
            self_weight: 0.0,
            peer_weight: 0.0,
        };
        let err = compute_webavalia(&[vec![1.0, 2.0], vec![1.0, 1.0]], 15.0, &params)
            .unwrap_err();
        assert!(matches!(err, ScoringError::DomainRange(_)));
    }
}
