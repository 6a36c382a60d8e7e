//! Label admission limits
//!
//! Samples whose label sets exceed these limits are dropped before they
//! reach storage. The maximum label name length is fixed and not
//! configurable here.

use serde::Deserialize;
use std::time::Duration;

/// Default maximum number of labels per timeseries
pub const DEFAULT_MAX_LABELS_PER_TIMESERIES: usize = 40;

/// Default maximum label value length in bytes
pub const DEFAULT_MAX_LABEL_VALUE_LEN: usize = 4 * 1024;

/// Default interval between warnings for the same violation kind
pub const DEFAULT_LIMIT_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound accepted for `max_label_value_len`
pub const MAX_LABEL_VALUE_LEN_CEILING: usize = 1024 * 1024;

/// Label limits configuration
///
/// # Example
///
/// ```toml
/// [limits]
/// max_labels_per_timeseries = 40
/// max_label_value_len = 4096
/// log_interval = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Samples with more labels are ignored
    /// Default: 40
    pub max_labels_per_timeseries: usize,

    /// Samples with a longer label value are ignored
    /// Default: 4096
    pub max_label_value_len: usize,

    /// Minimum interval between warnings per violation kind
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub log_interval: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_labels_per_timeseries: DEFAULT_MAX_LABELS_PER_TIMESERIES,
            max_label_value_len: DEFAULT_MAX_LABEL_VALUE_LEN,
            log_interval: DEFAULT_LIMIT_LOG_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LimitsConfig::default();
        assert_eq!(config.max_labels_per_timeseries, 40);
        assert_eq!(config.max_label_value_len, 4096);
        assert_eq!(config.log_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LimitsConfig = toml::from_str("max_label_value_len = 100").unwrap();
        assert_eq!(config.max_label_value_len, 100);
        assert_eq!(config.max_labels_per_timeseries, 40);
    }

    #[test]
    fn test_deserialize_interval_variants() {
        for (s, expected) in [
            ("500ms", Duration::from_millis(500)),
            ("5s", Duration::from_secs(5)),
            ("1m", Duration::from_secs(60)),
        ] {
            let toml = format!("log_interval = \"{}\"", s);
            let config: LimitsConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.log_interval, expected);
        }
    }
}
