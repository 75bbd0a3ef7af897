use serde::{Deserialize, Serialize};

use super::mode::CombinationMode;

/// Parameters of the QASS model.
///
/// Example YAML:
/// ```yaml
/// tuning_factor: 0.1
/// peer_rating_impact: 1.0
/// group_spread: 2.0
/// mode: bijunction
/// invariant:
///   join: 1.0e-9
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QassParams {
    /// Bias correction strength in [0, 1]; 0 keeps ratings as given
    pub tuning_factor: f64,

    /// Sensitivity exponent applied to the rating odds ratio (> 0)
    pub peer_rating_impact: f64,

    /// Base exponent controlling dispersion around the group score (> 0)
    pub group_spread: f64,

    /// Rating combination formula
    pub mode: CombinationMode,

    /// Tolerances of the split-join consistency checks
    pub invariant: InvariantTolerance,
}

impl Default for QassParams {
    fn default() -> Self {
        Self {
            tuning_factor: 0.0,
            peer_rating_impact: 1.0,
            group_spread: 2.0,
            mode: CombinationMode::Bijunction,
            invariant: InvariantTolerance::default(),
        }
    }
}

/// Tolerances for the split-join checks.
///
/// `join` bounds how far the score rebuilt from the joined mean
/// contribution may drift from the group product score. `average`, when
/// set, additionally bounds the gap between the arithmetic mean of the
/// individual scores and that rebuilt score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InvariantTolerance {
    pub join: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

impl Default for InvariantTolerance {
    fn default() -> Self {
        Self {
            join: 1e-9,
            average: None,
        }
    }
}

/// Self/peer weighting of the Webavalia model.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WebavaliaParams {
    pub self_weight: f64,
    pub peer_weight: f64,
}

impl Default for WebavaliaParams {
    fn default() -> Self {
        Self {
            self_weight: 1.0,
            peer_weight: 1.0,
        }
    }
}

/// Partial QASS parameters as written in config and assessment files.
///
/// Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QassSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning_factor: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_rating_impact: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_spread: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<CombinationMode>,

    /// Tolerance of the join check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invariant_tolerance: Option<f64>,

    /// Tolerance of the average check; unset leaves it disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_tolerance: Option<f64>,
}

impl QassSettings {
    /// Overlay these settings on `base`.
    pub fn apply(&self, base: QassParams) -> QassParams {
        QassParams {
            tuning_factor: self.tuning_factor.unwrap_or(base.tuning_factor),
            peer_rating_impact: self.peer_rating_impact.unwrap_or(base.peer_rating_impact),
            group_spread: self.group_spread.unwrap_or(base.group_spread),
            mode: self.mode.unwrap_or(base.mode),
            invariant: InvariantTolerance {
                join: self.invariant_tolerance.unwrap_or(base.invariant.join),
                average: self.average_tolerance.or(base.invariant.average),
            },
        }
    }
}

/// Partial Webavalia parameters as written in config and assessment files.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WebavaliaSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_weight: Option<f64>,
}

impl WebavaliaSettings {
    /// Overlay these settings on `base`.
    pub fn apply(&self, base: WebavaliaParams) -> WebavaliaParams {
        WebavaliaParams {
            self_weight: self.self_weight.unwrap_or(base.self_weight),
            peer_weight: self.peer_weight.unwrap_or(base.peer_weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_qass_params() {
        let params = QassParams::default();
        assert_eq!(params.tuning_factor, 0.0);
        assert_eq!(params.peer_rating_impact, 1.0);
        assert_eq!(params.group_spread, 2.0);
        assert_eq!(params.mode, CombinationMode::Bijunction);
        assert_eq!(params.invariant.join, 1e-9);
        assert!(params.invariant.average.is_none());
    }

    #[test]
    fn test_qass_params_serde_roundtrip() {
        let params = QassParams::default();
        let yaml = serde_saphyr::to_string(&params).unwrap();
        let parsed: QassParams = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(params, parsed);
    }

    #[test]
    fn test_partial_qass_params_parse() {
        let yaml = r#"
tuning_factor: 0.25
mode: conjunction
"#;
        let params: QassParams = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(params.tuning_factor, 0.25);
        assert_eq!(params.mode, CombinationMode::Conjunction);
        assert_eq!(params.group_spread, 2.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "tunning_factor: 0.1\n";
        assert!(serde_saphyr::from_str::<QassParams>(yaml).is_err());
    }

    #[test]
    fn test_settings_overlay() {
        let settings = QassSettings {
            group_spread: Some(3.0),
            average_tolerance: Some(0.01),
            ..Default::default()
        };
        let params = settings.apply(QassParams::default());
        assert_eq!(params.group_spread, 3.0);
        assert_eq!(params.tuning_factor, 0.0);
        assert_eq!(params.invariant.average, Some(0.01));
    }

    #[test]
    fn test_settings_layers_in_order() {
        let config = QassSettings {
            tuning_factor: Some(0.2),
            peer_rating_impact: Some(2.0),
            ..Default::default()
        };
        let file = QassSettings {
            tuning_factor: Some(0.4),
            ..Default::default()
        };
        let params = file.apply(config.apply(QassParams::default()));
        assert_eq!(params.tuning_factor, 0.4);
        assert_eq!(params.peer_rating_impact, 2.0);
    }

    #[test]
    fn test_empty_settings_parse() {
        let settings: WebavaliaSettings = serde_saphyr::from_str("{}").unwrap();
        assert!(settings.self_weight.is_none());
        let params = settings.apply(WebavaliaParams::default());
        assert_eq!(params, WebavaliaParams::default());
    }
}
