//! Human-readable metrics formatter
//!
//! One line per gauge, in the order of the snapshot.
//!
//! # Example Output
//!
//! ```text
//! [metrics] tell_rows_ignored_total{reason="too_long_label_name"} 0
//! [metrics] tell_rows_ignored_total{reason="too_many_labels"} 1200 (1.2K)
//! ```

use super::{MetricsFormatter, format_count, format_value};
use crate::GaugeSample;
use std::fmt::Write;

/// Human-readable metrics formatter
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self
    }
}

impl MetricsFormatter for HumanFormatter {
    fn format_gauges(&self, samples: &[GaugeSample]) -> String {
        if samples.is_empty() {
            return "[metrics] no gauges registered".to_string();
        }

        let mut output = String::new();
        for (i, sample) in samples.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            let _ = write!(
                output,
                "[metrics] {} {}",
                sample.name,
                format_value(sample.value)
            );

            // Large whole counts get a compact hint
            if sample.value >= 1000.0 && sample.value.fract() == 0.0 {
                let _ = write!(output, " ({})", format_count(sample.value as u64));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, value: f64) -> GaugeSample {
        GaugeSample {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_format_empty() {
        let formatter = HumanFormatter::new();
        assert_eq!(formatter.format_gauges(&[]), "[metrics] no gauges registered");
    }

    #[test]
    fn test_format_lines() {
        let formatter = HumanFormatter::new();
        let output = formatter.format_gauges(&[sample("a", 0.0), sample("b", 1500.0)]);

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[metrics] a 0");
        assert_eq!(lines[1], "[metrics] b 1500 (1.5K)");
    }
}
