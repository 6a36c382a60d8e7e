//! Tell Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use tell_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[limits]\nmax_labels_per_timeseries = 30").unwrap();
//! assert_eq!(config.limits.max_labels_per_timeseries, 30);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "console"
//! output = "stderr"
//!
//! [metrics]
//! enabled = true
//! format = "human"
//!
//! [limits]
//! max_labels_per_timeseries = 40
//! max_label_value_len = 4096
//! log_interval = "5s"
//!
//! [parser]
//! pool_capacity = 64
//! ```

mod error;
mod limits;
mod logging;
mod metrics;
mod parser;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use limits::{
    DEFAULT_LIMIT_LOG_INTERVAL, DEFAULT_MAX_LABEL_VALUE_LEN, DEFAULT_MAX_LABELS_PER_TIMESERIES,
    LimitsConfig, MAX_LABEL_VALUE_LEN_CEILING,
};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use metrics::{MetricsConfig, MetricsFormat};
pub use parser::{DEFAULT_PARSER_POOL_CAPACITY, ParserConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Metrics reporting configuration
    pub metrics: MetricsConfig,

    /// Label admission limits
    pub limits: LimitsConfig,

    /// JSON field extractor settings
    pub parser: ParserConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
