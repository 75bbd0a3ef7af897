use anyhow::Result;
use serde::Serialize;

use crate::assessment::Assessment;
use crate::config::Config;
use crate::scoring::{
    compute_qass_multi_component_observed, compute_qass_observed, compute_webavalia, QassParams,
    ScoringObserver, WebavaliaParams,
};

/// Which engine produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Qass,
    QassMultiComponent,
    Webavalia,
}

/// Score of one student, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentScore {
    pub name: String,
    pub score: f64,
    /// QASS contribution (single-component runs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution: Option<f64>,
    /// Webavalia weighted rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// Scored group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub method: Method,
    pub group_score: f64,
    pub mean_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_contribution: Option<f64>,
    pub students: Vec<StudentScore>,
}

/// QASS parameters after layering config and assessment overrides.
pub fn effective_qass_params(config: &Config, assessment: &Assessment) -> QassParams {
    let mut params = QassParams::default();
    if let Some(settings) = &config.qass {
        params = settings.apply(params);
    }
    if let Some(settings) = &assessment.qass {
        params = settings.apply(params);
    }
    params
}

/// Webavalia parameters after layering config and assessment overrides.
pub fn effective_webavalia_params(config: &Config, assessment: &Assessment) -> WebavaliaParams {
    let mut params = WebavaliaParams::default();
    if let Some(settings) = &config.webavalia {
        params = settings.apply(params);
    }
    if let Some(settings) = &assessment.webavalia {
        params = settings.apply(params);
    }
    params
}

/// Score an assessment with QASS.
///
/// One component gives scores and contributions; several components go
/// through the multi-component path, which yields scores only.
pub fn run_qass(
    assessment: &Assessment,
    config: &Config,
    observer: &mut dyn ScoringObserver,
) -> Result<Report> {
    let params = effective_qass_params(config, assessment);
    let (matrices, component_weights) = assessment.qass_components();
    let Some(first) = matrices.first() else {
        anyhow::bail!("Assessment has no ratings: add `ratings` or `components`");
    };

    let n = first.len();
    let weights = assessment.rater_weights_for(n);
    let labels = assessment.labels_for(n);
    tracing::debug!(students = n, components = matrices.len(), ?params, "running qass");

    let report = if matrices.len() == 1 {
        let result =
            compute_qass_observed(first, &weights, &params, assessment.group_score, observer)?;
        Report {
            method: Method::Qass,
            group_score: assessment.group_score,
            mean_score: result.mean_score,
            mean_contribution: Some(result.mean_contribution),
            students: labels
                .into_iter()
                .zip(result.scores.iter().zip(result.contributions.iter()))
                .map(|(name, (&score, &c))| StudentScore {
                    name,
                    score,
                    contribution: Some(c),
                    rating: None,
                })
                .collect(),
        }
    } else {
        let scores = compute_qass_multi_component_observed(
            &matrices,
            &weights,
            &component_weights,
            &params,
            assessment.group_score,
            observer,
        )?;
        Report {
            method: Method::QassMultiComponent,
            group_score: assessment.group_score,
            mean_score: scores.iter().sum::<f64>() / scores.len() as f64,
            mean_contribution: None,
            students: labels
                .into_iter()
                .zip(scores)
                .map(|(name, score)| StudentScore {
                    name,
                    score,
                    contribution: None,
                    rating: None,
                })
                .collect(),
        }
    };

    Ok(report)
}

/// Score an assessment with Webavalia.
pub fn run_webavalia(assessment: &Assessment, config: &Config) -> Result<Report> {
    let params = effective_webavalia_params(config, assessment);
    let Some(ratings) = &assessment.ratings else {
        anyhow::bail!("Assessment has no `ratings` matrix for webavalia");
    };

    tracing::debug!(students = ratings.len(), ?params, "running webavalia");
    let result = compute_webavalia(ratings, assessment.group_score, &params)?;
    let labels = assessment.labels_for(ratings.len());

    Ok(Report {
        method: Method::Webavalia,
        group_score: assessment.group_score,
        mean_score: result.mean_score,
        mean_contribution: None,
        students: labels
            .into_iter()
            .zip(result.scores.iter().zip(result.ratings.iter()))
            .map(|(name, (&score, &rating))| StudentScore {
                name,
                score,
                contribution: None,
                rating: Some(rating),
            })
            .collect(),
    })
}
