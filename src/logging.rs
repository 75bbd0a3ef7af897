use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::scoring::ScoringObserver;

/// Initialize structured logging based on CLI arguments
pub fn init_tracing(verbose: bool, log_level: Option<&str>, log_json: bool) -> Result<()> {
    let level = match (verbose, log_level) {
        (_, Some(level)) => level,
        (true, None) => "debug",
        (false, None) => "warn",
    };

    // PEER_SCORE_LOG overrides the command line
    let filter = EnvFilter::try_from_env("PEER_SCORE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if level.contains('=') {
            level.to_string()
        } else {
            format!("peer_score={}", level)
        })
    });

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Observer that reports every intermediate value as a debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScoringObserver for TracingObserver {
    fn rescaled(&mut self, component: usize, matrix: &[Vec<f64>]) {
        tracing::debug!(component, ?matrix, "rescaled ratings");
    }

    fn ratings(&mut self, component: usize, student_ratings: &[f64], mean_rating: f64) {
        tracing::debug!(component, ?student_ratings, mean_rating, "aggregate ratings");
    }

    fn contributions(&mut self, component: usize, contributions: &[f64]) {
        tracing::debug!(component, ?contributions, "contributions");
    }

    fn merged(&mut self, contributions: &[f64]) {
        tracing::debug!(?contributions, "final contributions");
    }

    fn invariant(&mut self, check: &'static str, expected: f64, actual: f64) {
        tracing::debug!(check, expected, actual, "split-join check passed");
    }
}
