use super::types::Assessment;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load an assessment from a YAML (or JSON) file
///
/// Only the file structure is checked here; matrix shapes and value
/// ranges are left to the scoring engines, which report them precisely.
pub fn load_assessment(path: &Path) -> Result<Assessment> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read assessment file at {}", path.display()))?;

    let assessment: Assessment = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse assessment file {}", path.display()))?;

    if let Some(names) = &assessment.students {
        let n = assessment
            .ratings
            .as_ref()
            .or_else(|| assessment.components.first().map(|c| &c.ratings))
            .map(|m| m.len());
        if let Some(n) = n {
            if names.len() != n {
                anyhow::bail!(
                    "{} lists {} students but the ratings cover {}",
                    path.display(),
                    names.len(),
                    n
                );
            }
        }
    }

    Ok(assessment)
}
