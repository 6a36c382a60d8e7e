//! Allow-once-per-interval throttle
//!
//! Bounds the volume of repetitive diagnostics under heavy error
//! conditions. Callers ask [`Throttle::allow`] before emitting; at most one
//! call per interval gets `true`, the rest are counted as suppressed.
//!
//! Lock-free: the next allowed instant is an atomic offset from a monotonic
//! origin, claimed with compare-exchange. Concurrent callers may race for
//! the same tick; exactly one of them wins it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tell_ingest::Throttle;
//!
//! let throttle = Throttle::new(Duration::from_secs(5));
//!
//! let logged = (0..1000).filter(|_| throttle.allow()).count();
//! assert_eq!(logged, 1);
//! assert_eq!(throttle.take_suppressed(), 999);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free allow-once-per-interval gate
#[derive(Debug)]
pub struct Throttle {
    /// Minimum time between allowed calls
    interval: Duration,

    /// Monotonic reference point for `next_allowed_ns`
    origin: Instant,

    /// Nanoseconds since `origin` before which calls are suppressed
    next_allowed_ns: AtomicU64,

    /// Calls suppressed since the last `take_suppressed`
    suppressed: AtomicU64,
}

impl Throttle {
    /// Create a throttle; the first call to `allow` always succeeds
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            origin: Instant::now(),
            next_allowed_ns: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Returns true if the caller may emit now
    #[inline]
    pub fn allow(&self) -> bool {
        let now = self.elapsed_ns();
        let next = self.next_allowed_ns.load(Ordering::Acquire);

        if now >= next {
            let deadline = now.saturating_add(self.interval_ns());
            if self
                .next_allowed_ns
                .compare_exchange(next, deadline, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }

        self.suppressed.fetch_add(1, Ordering::Relaxed);
        false
    }

    /// Return and reset the number of suppressed calls
    #[inline]
    pub fn take_suppressed(&self) -> u64 {
        self.suppressed.swap(0, Ordering::Relaxed)
    }

    /// Number of suppressed calls since the last `take_suppressed`
    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Minimum time between allowed calls
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    #[inline]
    fn interval_ns(&self) -> u64 {
        u64::try_from(self.interval.as_nanos()).unwrap_or(u64::MAX)
    }
}
