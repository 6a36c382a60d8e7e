//! Label admission limits
//!
//! Checks label sets against three limits before samples reach storage:
//!
//! - maximum number of labels per timeseries (configurable)
//! - maximum label name length ([`MAX_LABEL_NAME_LEN`], fixed)
//! - maximum label value length (configurable)
//!
//! Every rejection increments an exact per-reason counter. Warnings are
//! throttled per reason, so an operator sees a representative example and
//! the exact drop count without log flooding.
//!
//! # Example
//!
//! ```
//! use tell_ingest::{Label, LabelLimits, LabelsValidator};
//! use tell_metrics::GaugeRegistry;
//!
//! let registry = GaugeRegistry::new();
//! let validator = LabelsValidator::init(LabelLimits::default(), &registry);
//!
//! let labels = vec![Label::new("__name__", "http_requests_total"), Label::new("job", "api")];
//! assert!(!validator.exceeds(&labels));
//! ```

use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tell_config::{
    DEFAULT_LIMIT_LOG_INTERVAL, DEFAULT_MAX_LABEL_VALUE_LEN, DEFAULT_MAX_LABELS_PER_TIMESERIES,
    LimitsConfig,
};
use tell_metrics::{Counter, GaugeRegistry};

use crate::throttle::Throttle;

/// The maximum length of a label name
///
/// Samples with longer names are ignored.
pub const MAX_LABEL_NAME_LEN: usize = 256;

/// Metric family under which ignored-sample gauges are registered
pub const IGNORED_ROWS_METRIC: &str = "tell_rows_ignored_total";

/// Label holding the metric name
const METRIC_NAME_LABEL: &str = "__name__";

/// One dimension of a timeseries identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Render a label set as `metric{name="value",...}`
///
/// The `__name__` label is hoisted in front of the braces; the other
/// labels keep their given order. Values are quoted and escaped.
pub fn labels_to_string(labels: &[Label]) -> String {
    let metric_name = labels
        .iter()
        .find(|l| l.name == METRIC_NAME_LABEL)
        .map(|l| l.value.as_str());

    let mut out = String::new();
    let others = labels.iter().filter(|l| l.name != METRIC_NAME_LABEL);

    if let Some(name) = metric_name {
        out.push_str(name);
        if labels.len() == 1 {
            return out;
        }
    }

    out.push('{');
    for (i, label) in others.enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}={:?}", label.name, label.value);
    }
    out.push('}');
    out
}

/// Immutable admission limits, built once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLimits {
    /// Samples with more labels are ignored
    pub max_labels_per_timeseries: usize,

    /// Samples with a longer label value are ignored
    pub max_label_value_len: usize,

    /// Minimum interval between warnings per violation kind
    pub log_interval: Duration,
}

impl Default for LabelLimits {
    fn default() -> Self {
        Self {
            max_labels_per_timeseries: DEFAULT_MAX_LABELS_PER_TIMESERIES,
            max_label_value_len: DEFAULT_MAX_LABEL_VALUE_LEN,
            log_interval: DEFAULT_LIMIT_LOG_INTERVAL,
        }
    }
}

impl From<&LimitsConfig> for LabelLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_labels_per_timeseries: config.max_labels_per_timeseries,
            max_label_value_len: config.max_label_value_len,
            log_interval: config.log_interval,
        }
    }
}

/// Reason a label set was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitViolation {
    /// The set has more labels than allowed
    TooManyLabels,
    /// The label at `index` has a name longer than [`MAX_LABEL_NAME_LEN`]
    LabelNameTooLong { index: usize },
    /// The label at `index` has a value longer than allowed
    LabelValueTooLong { index: usize },
}

impl LimitViolation {
    /// Reason tag used in metric names and logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TooManyLabels => "too_many_labels",
            Self::LabelNameTooLong { .. } => "too_long_label_name",
            Self::LabelValueTooLong { .. } => "too_long_label_value",
        }
    }
}

/// Exact counts of ignored series, per reason
#[derive(Debug, Default)]
pub struct IgnoredSeriesMetrics {
    /// Series with too many labels
    pub too_many_labels: Counter,
    /// Series containing a label with a too long name
    pub too_long_label_name: Counter,
    /// Series containing a label with a too long value
    pub too_long_label_value: Counter,
}

impl IgnoredSeriesMetrics {
    pub const fn new() -> Self {
        Self {
            too_many_labels: Counter::new(),
            too_long_label_name: Counter::new(),
            too_long_label_value: Counter::new(),
        }
    }

    fn counter(&self, violation: LimitViolation) -> &Counter {
        match violation {
            LimitViolation::TooManyLabels => &self.too_many_labels,
            LimitViolation::LabelNameTooLong { .. } => &self.too_long_label_name,
            LimitViolation::LabelValueTooLong { .. } => &self.too_long_label_value,
        }
    }

    /// Take a snapshot of current values
    pub fn snapshot(&self) -> IgnoredSeriesSnapshot {
        IgnoredSeriesSnapshot {
            too_many_labels: self.too_many_labels.get(),
            too_long_label_name: self.too_long_label_name.get(),
            too_long_label_value: self.too_long_label_value.get(),
        }
    }
}

/// Point-in-time snapshot of ignored series counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IgnoredSeriesSnapshot {
    pub too_many_labels: u64,
    pub too_long_label_name: u64,
    pub too_long_label_value: u64,
}

impl IgnoredSeriesSnapshot {
    pub fn total(&self) -> u64 {
        self.too_many_labels + self.too_long_label_name + self.too_long_label_value
    }
}

/// Admission check for label sets
///
/// Holds no per-call state; share one instance (usually in an `Arc`)
/// across all ingestion workers.
#[derive(Debug)]
pub struct LabelsValidator {
    limits: LabelLimits,
    metrics: Arc<IgnoredSeriesMetrics>,
    too_many_labels_log: Throttle,
    too_long_label_name_log: Throttle,
    too_long_label_value_log: Throttle,
}

impl LabelsValidator {
    /// Create a validator for the given limits
    pub fn new(limits: LabelLimits) -> Self {
        Self {
            limits,
            metrics: Arc::new(IgnoredSeriesMetrics::new()),
            too_many_labels_log: Throttle::new(limits.log_interval),
            too_long_label_name_log: Throttle::new(limits.log_interval),
            too_long_label_value_log: Throttle::new(limits.log_interval),
        }
    }

    /// Create a validator and register its gauges
    ///
    /// Call once during startup, before ingestion workers start.
    pub fn init(limits: LabelLimits, registry: &GaugeRegistry) -> Arc<Self> {
        let validator = Self::new(limits);
        validator.register_gauges(registry);
        Arc::new(validator)
    }

    /// Register one `tell_rows_ignored_total{reason="..."}` gauge per reason
    pub fn register_gauges(&self, registry: &GaugeRegistry) {
        let gauges: [(&str, fn(&IgnoredSeriesMetrics) -> &Counter); 3] = [
            ("too_many_labels", |m| &m.too_many_labels),
            ("too_long_label_name", |m| &m.too_long_label_name),
            ("too_long_label_value", |m| &m.too_long_label_value),
        ];

        for (reason, counter) in gauges {
            let metrics = Arc::clone(&self.metrics);
            registry.register_gauge(
                format!("{IGNORED_ROWS_METRIC}{{reason=\"{reason}\"}}"),
                move || counter(&metrics).get() as f64,
            );
        }
    }

    /// Configured limits
    #[inline]
    pub fn limits(&self) -> &LabelLimits {
        &self.limits
    }

    /// Shared handle to the ignored series counters
    pub fn metrics_handle(&self) -> Arc<IgnoredSeriesMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Find the first limit the label set violates, without side effects
    ///
    /// The label count is checked first, then each label in order: name
    /// length before value length.
    pub fn check(&self, labels: &[Label]) -> Option<LimitViolation> {
        if labels.len() > self.limits.max_labels_per_timeseries {
            return Some(LimitViolation::TooManyLabels);
        }

        labels.iter().enumerate().find_map(|(index, label)| {
            if label.name.len() > MAX_LABEL_NAME_LEN {
                Some(LimitViolation::LabelNameTooLong { index })
            } else if label.value.len() > self.limits.max_label_value_len {
                Some(LimitViolation::LabelValueTooLong { index })
            } else {
                None
            }
        })
    }

    /// Returns true if the label set exceeds a limit and must be dropped
    ///
    /// Rejections increment the matching counter and may log a throttled
    /// warning. Admitted sets have no side effects.
    pub fn exceeds(&self, labels: &[Label]) -> bool {
        match self.check(labels) {
            Some(violation) => {
                self.track_ignored(violation, labels);
                true
            }
            None => false,
        }
    }

    fn track_ignored(&self, violation: LimitViolation, labels: &[Label]) {
        self.metrics.counter(violation).inc();

        // The series is only rendered once a warning is actually due
        match violation {
            LimitViolation::TooManyLabels => {
                if !self.too_many_labels_log.allow() {
                    return;
                }
                tracing::warn!(
                    reason = violation.reason(),
                    labels = labels.len(),
                    limit = self.limits.max_labels_per_timeseries,
                    suppressed = self.too_many_labels_log.take_suppressed(),
                    series = %labels_to_string(labels),
                    "ignoring series with too many labels; reduce the number of labels for this metric or increase [limits] max_labels_per_timeseries"
                );
            }
            LimitViolation::LabelNameTooLong { index } => {
                if !self.too_long_label_name_log.allow() {
                    return;
                }
                let label = &labels[index];
                tracing::warn!(
                    reason = violation.reason(),
                    label = %label.name,
                    length = label.name.len(),
                    limit = MAX_LABEL_NAME_LEN,
                    suppressed = self.too_long_label_name_log.take_suppressed(),
                    series = %labels_to_string(labels),
                    "ignoring series with too long label name; consider reducing label name length"
                );
            }
            LimitViolation::LabelValueTooLong { index } => {
                if !self.too_long_label_value_log.allow() {
                    return;
                }
                let label = &labels[index];
                tracing::warn!(
                    reason = violation.reason(),
                    label = %label.name,
                    value = ?label.value,
                    length = label.value.len(),
                    limit = self.limits.max_label_value_len,
                    suppressed = self.too_long_label_value_log.take_suppressed(),
                    series = %labels_to_string(labels),
                    "ignoring series with too long label value; reduce the label value length or increase [limits] max_label_value_len"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "labels_test.rs"]
mod labels_test;
