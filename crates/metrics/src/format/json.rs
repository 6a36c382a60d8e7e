//! JSON metrics formatter
//!
//! Formats a gauge snapshot as structured JSON for machine parsing.
//!
//! # Example Output
//!
//! ```json
//! {"type":"gauges","gauges":[{"name":"tell_rows_ignored_total{reason=\"too_many_labels\"}","value":3.0}]}
//! ```

use super::MetricsFormatter;
use crate::GaugeSample;
use serde::Serialize;

/// JSON metrics formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct GaugesJson<'a> {
    #[serde(rename = "type")]
    report_type: &'static str,
    gauges: &'a [GaugeSample],
}

impl MetricsFormatter for JsonFormatter {
    fn format_gauges(&self, samples: &[GaugeSample]) -> String {
        let json = GaugesJson {
            report_type: "gauges",
            gauges: samples,
        };

        // Use compact JSON (no pretty printing for log lines)
        serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_gauges_json() {
        let formatter = JsonFormatter::new();
        let samples = vec![GaugeSample {
            name: "ignored".to_string(),
            value: 3.0,
        }];

        let output = formatter.format_gauges(&samples);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["type"], "gauges");
        assert_eq!(parsed["gauges"][0]["name"], "ignored");
        assert_eq!(parsed["gauges"][0]["value"], 3.0);
    }

    #[test]
    fn test_format_empty_json() {
        let formatter = JsonFormatter::new();
        let parsed: serde_json::Value =
            serde_json::from_str(&formatter.format_gauges(&[])).unwrap();
        assert!(parsed["gauges"].as_array().unwrap().is_empty());
    }
}
