use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use crate::scoring::{QassSettings, WebavaliaSettings};

/// Top-level config file.
///
/// Example YAML:
/// ```yaml
/// format: table
/// qass:
///   tuning_factor: 0.1
///   group_spread: 2.0
/// webavalia:
///   self_weight: 0.5
///   peer_weight: 1.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default output format when `--format` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Default QASS parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qass: Option<QassSettings>,

    /// Default Webavalia weights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webavalia: Option<WebavaliaSettings>,
}
