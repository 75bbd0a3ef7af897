use super::config::{QassParams, WebavaliaParams};
use super::mode::CombinationMode;

/// Validate QASS parameters at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_qass_params(params: &QassParams) -> Result<(), Vec<String>> {
    let mut errors = qass_scalar_errors(params);

    if params.mode != CombinationMode::Bijunction {
        errors.push(format!("qass.mode: '{}' is not implemented", params.mode));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate Webavalia parameters at startup.
pub fn validate_webavalia_params(params: &WebavaliaParams) -> Result<(), Vec<String>> {
    let errors = webavalia_scalar_errors(params);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Range problems with the QASS scalars. Mode selection is reported
/// separately by the engine as an unimplemented mode.
pub(crate) fn qass_scalar_errors(params: &QassParams) -> Vec<String> {
    let mut errors = Vec::new();

    let t = params.tuning_factor;
    if !(0.0..=1.0).contains(&t) {
        errors.push(format!("qass.tuning_factor: {} is outside [0, 1]", t));
    }

    if !is_positive(params.peer_rating_impact) {
        errors.push(format!(
            "qass.peer_rating_impact: {} must be positive",
            params.peer_rating_impact
        ));
    }

    if !is_positive(params.group_spread) {
        errors.push(format!(
            "qass.group_spread: {} must be positive",
            params.group_spread
        ));
    }

    if !is_non_negative(params.invariant.join) {
        errors.push(format!(
            "qass.invariant.join: {} must be non-negative",
            params.invariant.join
        ));
    }

    if let Some(avg) = params.invariant.average {
        if !is_non_negative(avg) {
            errors.push(format!("qass.invariant.average: {} must be non-negative", avg));
        }
    }

    errors
}

pub(crate) fn webavalia_scalar_errors(params: &WebavaliaParams) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_non_negative(params.self_weight) {
        errors.push(format!(
            "webavalia.self_weight: {} must be non-negative",
            params.self_weight
        ));
    }
    if !is_non_negative(params.peer_weight) {
        errors.push(format!(
            "webavalia.peer_weight: {} must be non-negative",
            params.peer_weight
        ));
    }
    if params.self_weight == 0.0 && params.peer_weight == 0.0 {
        errors.push("webavalia: self_weight and peer_weight cannot both be zero".to_string());
    }

    errors
}

/// Problems with a group score used as the base of the power law.
pub(crate) fn group_score_error(group_score: f64) -> Option<String> {
    if is_positive(group_score) {
        None
    } else {
        Some(format!("group score {} must be a positive number", group_score))
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::InvariantTolerance;

    #[test]
    fn test_valid_params() {
        assert!(validate_qass_params(&QassParams::default()).is_ok());
        assert!(validate_webavalia_params(&WebavaliaParams::default()).is_ok());
    }

    #[test]
    fn test_tuning_factor_out_of_range() {
        let params = QassParams {
            tuning_factor: 1.5,
            ..Default::default()
        };
        let errors = validate_qass_params(&params).unwrap_err();
        assert!(errors[0].contains("qass.tuning_factor"));
    }

    #[test]
    fn test_nan_rejected() {
        let params = QassParams {
            tuning_factor: f64::NAN,
            ..Default::default()
        };
        assert!(validate_qass_params(&params).is_err());
    }

    #[test]
    fn test_unimplemented_mode_reported() {
        let params = QassParams {
            mode: CombinationMode::Disjunction,
            ..Default::default()
        };
        let errors = validate_qass_params(&params).unwrap_err();
        assert_eq!(errors, vec!["qass.mode: 'disjunction' is not implemented"]);
    }

    #[test]
    fn test_collects_all_errors() {
        let params = QassParams {
            tuning_factor: -0.1,    // Error 1
            peer_rating_impact: 0.0, // Error 2
            group_spread: -2.0,     // Error 3
            mode: CombinationMode::Bijunction,
            invariant: InvariantTolerance {
                join: 1e-9,
                average: Some(-1.0), // Error 4
            },
        };
        let errors = validate_qass_params(&params).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_webavalia_both_weights_zero() {
        let params = WebavaliaParams {
            self_weight: 0.0,
            peer_weight: 0.0,
        };
        let errors = validate_webavalia_params(&params).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("both be zero"));
    }

    #[test]
    fn test_webavalia_negative_weight() {
        let params = WebavaliaParams {
            self_weight: -1.0,
            peer_weight: 1.0,
        };
        let errors = validate_webavalia_params(&params).unwrap_err();
        assert!(errors[0].contains("webavalia.self_weight"));
    }

    #[test]
    fn test_group_score_must_be_positive() {
        assert!(group_score_error(0.8).is_none());
        assert!(group_score_error(0.0).is_some());
        assert!(group_score_error(f64::INFINITY).is_some());
    }
}
