//! `[log]` section
//!
//! Diagnostics go to stderr unless configured otherwise: the collector
//! writes its records to stdout.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Minimum severity that is logged
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::invalid_value(
                "log",
                "level",
                format!("'{s}' is not one of trace, debug, info, warn, error"),
            )),
        }
    }
}

/// Line format of log records
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text for terminals
    #[default]
    Console,
    /// One JSON object per record
    Json,
}

/// Stream that receives log records
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
}

/// `[log]` settings
///
/// ```toml
/// [log]
/// level = "warn"
/// format = "json"
/// output = "stderr"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
}

impl LogConfig {
    /// Level to run with: `cli` when given, the configured level otherwise
    pub fn effective_level(&self, cli: Option<LogLevel>) -> LogLevel {
        cli.unwrap_or(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_log_info_to_stderr() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn test_json_to_stdout() {
        let config: LogConfig =
            toml::from_str("level = \"warn\"\nformat = \"json\"\noutput = \"stdout\"").unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stdout);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);

        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(err.to_string().contains("'verbose'"));
    }

    #[test]
    fn test_level_round_trips_through_display() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_cli_level_overrides_config() {
        let config = LogConfig {
            level: LogLevel::Error,
            ..Default::default()
        };
        assert_eq!(config.effective_level(None), LogLevel::Error);
        assert_eq!(config.effective_level(Some(LogLevel::Trace)), LogLevel::Trace);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(toml::from_str::<LogConfig>("output = \"syslog\"").is_err());
        assert!(toml::from_str::<LogConfig>("level = \"loud\"").is_err());
    }
}
