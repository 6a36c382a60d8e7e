//! Configuration validation
//!
//! Validates value ranges:
//! - Label limits are non-zero and bounded
//! - Warning interval is non-zero
//! - Parser pool keeps at least one extractor

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::limits::{LimitsConfig, MAX_LABEL_VALUE_LEN_CEILING};
use crate::parser::ParserConfig;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_limits(&config.limits)?;
    validate_parser(&config.parser)?;
    Ok(())
}

fn validate_limits(limits: &LimitsConfig) -> Result<()> {
    if limits.max_labels_per_timeseries == 0 {
        return Err(ConfigError::invalid_value(
            "limits",
            "max_labels_per_timeseries",
            "must be greater than 0",
        ));
    }

    if limits.max_label_value_len == 0 {
        return Err(ConfigError::invalid_value(
            "limits",
            "max_label_value_len",
            "must be greater than 0",
        ));
    }

    if limits.max_label_value_len > MAX_LABEL_VALUE_LEN_CEILING {
        return Err(ConfigError::invalid_value(
            "limits",
            "max_label_value_len",
            format!(
                "{} exceeds the maximum of {}",
                limits.max_label_value_len, MAX_LABEL_VALUE_LEN_CEILING
            ),
        ));
    }

    if limits.log_interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "limits",
            "log_interval",
            "must be greater than 0",
        ));
    }

    Ok(())
}

fn validate_parser(parser: &ParserConfig) -> Result<()> {
    if parser.pool_capacity == 0 {
        return Err(ConfigError::invalid_value(
            "parser",
            "pool_capacity",
            "must be greater than 0",
        ));
    }

    Ok(())
}
