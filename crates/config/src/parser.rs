//! JSON field extractor configuration

use serde::Deserialize;

/// Default number of idle extractors kept for reuse
pub const DEFAULT_PARSER_POOL_CAPACITY: usize = 64;

/// Field extractor configuration
///
/// # Example
///
/// ```toml
/// [parser]
/// pool_capacity = 64
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of idle extractors retained between uses.
    /// Extractors released while the pool is full are dropped.
    /// Default: 64
    pub pool_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_PARSER_POOL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(ParserConfig::default().pool_capacity, 64);
    }

    #[test]
    fn test_deserialize() {
        let config: ParserConfig = toml::from_str("pool_capacity = 16").unwrap();
        assert_eq!(config.pool_capacity, 16);
    }
}
