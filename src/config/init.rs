use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{get_config_path, Config};
use crate::output::OutputFormat;
use crate::scoring::{QassParams, QassSettings, WebavaliaParams, WebavaliaSettings};

/// Config with every setting spelled out at its built-in default.
fn default_config() -> Config {
    let qass = QassParams::default();
    let webavalia = WebavaliaParams::default();
    Config {
        format: Some(OutputFormat::Table),
        qass: Some(QassSettings {
            tuning_factor: Some(qass.tuning_factor),
            peer_rating_impact: Some(qass.peer_rating_impact),
            group_spread: Some(qass.group_spread),
            mode: Some(qass.mode),
            invariant_tolerance: Some(qass.invariant.join),
            average_tolerance: None,
        }),
        webavalia: Some(WebavaliaSettings {
            self_weight: Some(webavalia.self_weight),
            peer_weight: Some(webavalia.peer_weight),
        }),
    }
}

/// Write a config file holding the built-in defaults.
///
/// Uses the default location when `path` is None. Refuses to replace an
/// existing file unless `force` is set. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let yaml = serde_saphyr::to_string(&default_config())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    save(&config_path, &yaml)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    Ok(config_path)
}

fn save(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}
