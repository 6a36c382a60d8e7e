//! `[metrics]` section
//!
//! Selects whether the collector prints its gauge report at the end of a
//! run, and in which format.

use serde::Deserialize;

/// Rendering of the gauge report
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetricsFormat {
    /// `[metrics] name value` lines
    #[default]
    Human,
    /// A single JSON document
    Json,
}

/// `[metrics]` settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Print the gauge report (default: true)
    pub enabled: bool,

    pub format: MetricsFormat,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: MetricsFormat::default(),
        }
    }
}
