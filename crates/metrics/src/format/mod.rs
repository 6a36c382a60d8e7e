//! Metrics output formatters
//!
//! Formats a gauge snapshot for human-readable or JSON output.

mod human;
mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::GaugeSample;

/// Trait for metrics formatters
pub trait MetricsFormatter: Send + Sync {
    /// Format a registry snapshot as a single report
    fn format_gauges(&self, samples: &[GaugeSample]) -> String;
}

/// Format count with K/M suffix for readability
pub fn format_count(count: u64) -> String {
    const K: u64 = 1000;
    const M: u64 = 1_000_000;

    if count >= M {
        format!("{:.1}M", count as f64 / M as f64)
    } else if count >= K {
        format!("{:.1}K", count as f64 / K as f64)
    } else {
        count.to_string()
    }
}

/// Format a gauge value, dropping the fraction for whole numbers
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(500), "500");
        assert_eq!(format_count(1000), "1.0K");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(1_000_000), "1.0M");
        assert_eq!(format_count(1_500_000), "1.5M");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(1000.0), "1000");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(-5.0), "-5");
    }

    #[test]
    fn test_format_value_beyond_i64() {
        assert_eq!(format_value(1e19), "10000000000000000000");
        assert_eq!(format_value(-1e19), "-10000000000000000000");
    }
}
