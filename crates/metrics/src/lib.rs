//! Tell - Metrics
//!
//! Internal metrics for the ingestion admission layer.
//!
//! # Overview
//!
//! This crate provides:
//! - `Counter`, an atomic monotonically increasing counter
//! - `GaugeRegistry`, a registry of named callback gauges that exposes
//!   counters owned by other components
//! - Formatters that render a registry snapshot for operators (human, JSON)
//!
//! # Design Principles
//!
//! - **Lock-free updates**: Counters are plain atomics, incremented on the hot path
//! - **Pull-based reads**: Gauges are callbacks evaluated only when a snapshot is taken
//! - **Registration once**: Components register their gauges during startup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tell_metrics::{Counter, GaugeRegistry};
//!
//! let ignored = Arc::new(Counter::new());
//! let registry = GaugeRegistry::new();
//!
//! let handle = Arc::clone(&ignored);
//! registry.register_gauge(r#"rows_ignored_total{reason="too_many_labels"}"#, move || {
//!     handle.get() as f64
//! });
//!
//! ignored.inc();
//! assert_eq!(registry.snapshot()[0].value, 1.0);
//! ```

pub mod format;
mod registry;

pub use format::{HumanFormatter, JsonFormatter, MetricsFormatter};
pub use registry::{GaugeRegistry, GaugeSample};

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter wrapper for convenient metric operations
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Create a new counter initialized to 0
    #[inline]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increment the counter by `val` (relaxed ordering for performance)
    #[inline]
    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    /// Increment the counter by 1
    #[inline]
    pub fn inc(&self) {
        self.add(1);
    }

    /// Get the current value (relaxed ordering)
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset the counter to 0 and return the previous value
    #[inline]
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_counter_inc_and_add() {
        let counter = Counter::new();
        counter.inc();
        counter.add(41);
        assert_eq!(counter.get(), 42);
    }

    #[test]
    fn test_counter_take_resets() {
        let counter = Counter::new();
        counter.add(7);
        assert_eq!(counter.take(), 7);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_counter_concurrent_increments() {
        let counter = Arc::new(Counter::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    counter.inc();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), 8000);
    }
}
