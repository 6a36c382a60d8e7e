//! Named gauge registry
//!
//! Components own their counters and register read callbacks here. The
//! registry never stores values itself; a snapshot evaluates every
//! callback in name order.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;
use serde::Serialize;

type GaugeFn = Box<dyn Fn() -> f64 + Send + Sync>;

/// One gauge reading taken by [`GaugeRegistry::snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSample {
    pub name: String,
    pub value: f64,
}

/// Registry of named callback gauges
///
/// Registration happens at startup; reads take a shared lock and may run
/// concurrently with each other.
#[derive(Default)]
pub struct GaugeRegistry {
    gauges: RwLock<BTreeMap<String, GaugeFn>>,
}

impl GaugeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gauge under `name`
    ///
    /// Registering an existing name replaces the previous callback, so
    /// re-running component initialization is harmless.
    pub fn register_gauge<F>(&self, name: impl Into<String>, read: F)
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.gauges.write().insert(name.into(), Box::new(read));
    }

    /// Remove a gauge, returning whether it was registered
    pub fn unregister(&self, name: &str) -> bool {
        self.gauges.write().remove(name).is_some()
    }

    /// Read a single gauge
    pub fn get(&self, name: &str) -> Option<f64> {
        self.gauges.read().get(name).map(|read| read())
    }

    /// Whether a gauge with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.gauges.read().contains_key(name)
    }

    /// Number of registered gauges
    pub fn len(&self) -> usize {
        self.gauges.read().len()
    }

    /// Whether no gauges are registered
    pub fn is_empty(&self) -> bool {
        self.gauges.read().is_empty()
    }

    /// Evaluate every gauge, ordered by name
    pub fn snapshot(&self) -> Vec<GaugeSample> {
        self.gauges
            .read()
            .iter()
            .map(|(name, read)| GaugeSample {
                name: name.clone(),
                value: read(),
            })
            .collect()
    }
}

impl fmt::Debug for GaugeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gauges = self.gauges.read();
        f.debug_struct("GaugeRegistry")
            .field("gauges", &gauges.keys().collect::<Vec<_>>())
            .finish()
    }
}
