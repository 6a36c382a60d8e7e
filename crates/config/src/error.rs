//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error - invalid value
    #[error("[{section}] has invalid {field}: {message}")]
    InvalidValue {
        /// Config section (e.g., "limits", "parser")
        section: &'static str,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    /// Create an InvalidValue error
    pub fn invalid_value(
        section: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            section,
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("limits", "max_label_value_len", "must be > 0");
        assert_eq!(
            err.to_string(),
            "[limits] has invalid max_label_value_len: must be > 0"
        );
    }

    #[test]
    fn test_io_error_display() {
        let err = ConfigError::IoError {
            path: "tell.toml".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("tell.toml"));
        assert!(err.to_string().contains("missing"));
    }
}
