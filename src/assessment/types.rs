use serde::{Deserialize, Serialize};

use crate::scoring::{QassSettings, WebavaliaSettings};

/// One group's peer assessment as read from disk.
///
/// QASS reads `components` (or a bare `ratings` matrix as a single
/// component); Webavalia reads `ratings`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Assessment {
    /// Display names, one per student, in matrix order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<String>>,

    /// Score awarded to the group as a whole
    pub group_score: f64,

    /// Per-rater weights; uniform when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rater_weights: Option<Vec<f64>>,

    /// Scoring periods, each with its own peer-rating matrix
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,

    /// Single peer-rating matrix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<Vec<f64>>>,

    /// Per-assessment QASS overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qass: Option<QassSettings>,

    /// Per-assessment Webavalia overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webavalia: Option<WebavaliaSettings>,
}

/// A scoring period of a QASS assessment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Component {
    /// Importance of this period relative to the others; 1/K when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    pub ratings: Vec<Vec<f64>>,
}

impl Assessment {
    /// Matrices and weights of the QASS scoring periods.
    ///
    /// A bare `ratings` matrix counts as one period of weight 1 when no
    /// components are listed. Components without a weight get 1/K, so a
    /// file that weights none of its K periods weighs them uniformly.
    pub fn qass_components(&self) -> (Vec<Vec<Vec<f64>>>, Vec<f64>) {
        if self.components.is_empty() {
            match &self.ratings {
                Some(ratings) => (vec![ratings.clone()], vec![1.0]),
                None => (Vec::new(), Vec::new()),
            }
        } else {
            let uniform = 1.0 / self.components.len() as f64;
            self.components
                .iter()
                .map(|c| (c.ratings.clone(), c.weight.unwrap_or(uniform)))
                .unzip()
        }
    }

    /// Rater weights for a group of `n`, uniform when none were given.
    pub fn rater_weights_for(&self, n: usize) -> Vec<f64> {
        match &self.rater_weights {
            Some(w) => w.clone(),
            None => vec![1.0 / n as f64; n],
        }
    }

    /// Display names for a group of `n`.
    pub fn labels_for(&self, n: usize) -> Vec<String> {
        match &self.students {
            Some(names) => names.clone(),
            None => (1..=n).map(|i| format!("student {}", i)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Assessment {
        serde_saphyr::from_str(yaml).unwrap()
    }

    #[test]
    fn test_bare_ratings_are_one_component() {
        let a = parse(
            r#"
group_score: 0.8
ratings:
  - [0.5, 0.6]
  - [0.4, 0.5]
"#,
        );
        let (matrices, weights) = a.qass_components();
        assert_eq!(matrices.len(), 1);
        assert_eq!(weights, vec![1.0]);
    }

    #[test]
    fn test_components_with_default_weight() {
        let a = parse(
            r#"
group_score: 0.8
components:
  - ratings: [[0.5, 0.6], [0.4, 0.5]]
  - weight: 0.25
    ratings: [[0.5, 0.7], [0.3, 0.5]]
"#,
        );
        let (matrices, weights) = a.qass_components();
        assert_eq!(matrices.len(), 2);
        assert_eq!(weights, vec![0.5, 0.25]);
    }

    #[test]
    fn test_unweighted_components_are_uniform() {
        let a = parse(
            r#"
group_score: 0.8
components:
  - ratings: [[0.5, 0.6], [0.4, 0.5]]
  - ratings: [[0.5, 0.7], [0.3, 0.5]]
  - ratings: [[0.5, 0.4], [0.6, 0.5]]
  - ratings: [[0.5, 0.5], [0.5, 0.5]]
"#,
        );
        let (_, weights) = a.qass_components();
        assert_eq!(weights, vec![0.25; 4]);
    }

    #[test]
    fn test_default_weights_and_labels() {
        let a = parse("group_score: 10\nratings: [[1, 2], [3, 4]]\n");
        assert_eq!(a.rater_weights_for(4), vec![0.25; 4]);
        assert_eq!(a.labels_for(2), vec!["student 1", "student 2"]);
    }

    #[test]
    fn test_overrides_parse() {
        let a = parse(
            r#"
students: [ana, bruno]
group_score: 0.7
rater_weights: [0.6, 0.4]
ratings: [[0.5, 0.6], [0.4, 0.5]]
qass:
  tuning_factor: 0.1
webavalia:
  self_weight: 0.0
"#,
        );
        assert_eq!(a.labels_for(2), vec!["ana", "bruno"]);
        assert_eq!(a.rater_weights_for(2), vec![0.6, 0.4]);
        assert_eq!(a.qass.unwrap().tuning_factor, Some(0.1));
        assert_eq!(a.webavalia.unwrap().self_weight, Some(0.0));
    }

    #[test]
    fn test_missing_group_score_rejected() {
        assert!(serde_saphyr::from_str::<Assessment>("ratings: [[0.5]]\n").is_err());
    }
}
