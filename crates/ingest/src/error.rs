//! Field extraction error types

use thiserror::Error;

use crate::json::JsonKind;

/// Result type for field extraction
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors returned when a log line cannot be flattened
///
/// Both variants reject the whole line; no partial field list is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input is not valid JSON
    #[error("cannot parse json: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Input is valid JSON but the top-level value is not an object
    #[error("expecting json object; got {kind}")]
    UnexpectedRootType {
        /// Type of the top-level value that was found
        kind: JsonKind,
    },
}

impl ParseError {
    /// Create an UnexpectedRootType error
    pub fn unexpected_root(kind: JsonKind) -> Self {
        Self::UnexpectedRootType { kind }
    }

    /// Whether the input failed to tokenize
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_root_display() {
        let err = ParseError::unexpected_root(JsonKind::Array);
        assert_eq!(err.to_string(), "expecting json object; got array");
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_malformed_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParseError = serde_err.into();
        assert!(err.is_malformed());
        assert!(err.to_string().starts_with("cannot parse json: "));
    }
}
