//! Lock-free pool of reusable instances
//!
//! Keeps idle instances (typically ones owning large scratch buffers) in a
//! bounded lock-free queue so the hot path reuses their allocations.
//!
//! # Performance
//!
//! - **Get**: lock-free pop, falls back to `T::default()` when empty
//! - **Put**: reset + lock-free push, instance dropped when the pool is full
//!
//! # Example
//!
//! ```
//! use tell_ingest::{FieldExtractor, Pool};
//!
//! let pool: Pool<FieldExtractor> = Pool::new(16);
//!
//! {
//!     let mut parser = pool.get();
//!     parser.parse(br#"{"msg":"hello"}"#, "").unwrap();
//! } // returned to the pool here, even on early return or `?`
//!
//! assert_eq!(pool.available(), 1);
//! ```

use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};

use crossbeam::queue::ArrayQueue;
use serde::Serialize;
use tell_metrics::Counter;

/// Types that can be recycled through a [`Pool`]
///
/// `reset` must leave the instance indistinguishable from a fresh one to
/// its next user, while keeping allocated capacity.
pub trait Reusable: Default + Send {
    /// Clear all state before the instance is handed out again
    fn reset(&mut self);
}

/// Bounded lock-free pool of reusable instances
///
/// Starts empty; instances are allocated on demand and retained on
/// release up to `capacity`.
pub struct Pool<T> {
    /// Idle instances
    queue: ArrayQueue<T>,

    /// Metrics
    metrics: PoolMetrics,
}

/// Metrics for pool monitoring
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Number of successful pool hits (instance reused)
    pub hits: Counter,

    /// Number of pool misses (new instance allocated)
    pub misses: Counter,

    /// Number of instances returned to the pool
    pub returns: Counter,

    /// Number of instances dropped on release (pool was full)
    pub drops: Counter,
}

impl PoolMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            hits: Counter::new(),
            misses: Counter::new(),
            returns: Counter::new(),
            drops: Counter::new(),
        }
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            hits: self.hits.get(),
            misses: self.misses.get(),
            returns: self.returns.get(),
            drops: self.drops.get(),
        }
    }
}

/// Point-in-time snapshot of pool metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

impl PoolMetricsSnapshot {
    /// Calculate hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl<T: Reusable> Pool<T> {
    /// Create an empty pool retaining at most `capacity` idle instances
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            metrics: PoolMetrics::new(),
        }
    }

    /// Acquire an instance
    ///
    /// Returns a pooled instance if one is idle, otherwise allocates a new
    /// one. The guard returns the instance to this pool when dropped.
    #[inline]
    pub fn get(&self) -> Pooled<'_, T> {
        let item = match self.queue.pop() {
            Some(item) => {
                self.metrics.hits.inc();
                item
            }
            None => {
                self.metrics.misses.inc();
                T::default()
            }
        };

        Pooled { pool: self, item }
    }

    /// Reset an instance and return it to the pool
    ///
    /// If the pool is full the instance is dropped.
    #[inline]
    pub fn put(&self, mut item: T) {
        item.reset();

        match self.queue.push(item) {
            Ok(()) => self.metrics.returns.inc(),
            Err(_) => {
                self.metrics.drops.inc();
                tracing::debug!(capacity = self.queue.capacity(), "pool full, dropping instance");
            }
        }
    }

    /// Number of idle instances currently in the pool
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of idle instances retained
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    /// Check if the pool has no idle instances
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Check if the pool is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }
}

/// Scoped handle to a pooled instance
///
/// Dereferences to `T`. The instance goes back to its pool when the handle
/// is dropped, on every exit path.
pub struct Pooled<'a, T: Reusable> {
    pool: &'a Pool<T>,
    item: T,
}

impl<T: Reusable> Pooled<'_, T> {
    /// Return the instance to the pool now
    ///
    /// Equivalent to dropping the handle.
    #[inline]
    pub fn release(self) {
        drop(self);
    }

    /// Take ownership of the instance without returning it to the pool
    pub fn detach(self) -> T {
        let mut this = ManuallyDrop::new(self);
        mem::take(&mut this.item)
    }
}

impl<T: Reusable> Deref for Pooled<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Reusable> DerefMut for Pooled<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Reusable> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.put(mem::take(&mut self.item));
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
