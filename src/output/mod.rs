pub mod formatter;

pub use formatter::{
    format_contribution, format_json, format_report_table, format_score, format_tsv, render,
    round2, should_use_colors, Envelope,
};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// How results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned table for terminals
    #[default]
    Table,
    /// Tab-separated values for scripting
    Tsv,
    /// JSON envelope with two-decimal scores
    Json,
}

/// Write rendered output to a file atomically
///
/// The file is never left half-written: it either keeps its old contents
/// or holds the complete new output.
pub fn write_output(path: &Path, rendered: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(rendered.as_bytes())
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save output to {}", path.display()))?;
    Ok(())
}
