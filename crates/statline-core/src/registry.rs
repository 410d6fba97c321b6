//! Thread-safe metric registry with snapshot-and-reset semantics.
//!
//! All operations serialize on one registry-wide lock with short critical
//! sections. `snapshot_and_reset` holds the lock for its whole duration, so
//! no update, add, or remove interleaves mid-snapshot: every metric is
//! rendered and reset as one logical event.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::metric::{Metric, Value};

/// One snapshot's worth of `(name, rendered value)` pairs, destined for one
/// log line. Produced atomically from a single registry state; the registry
/// keeps no reference after the snapshot call returns.
pub type SnapshotBatch = Vec<(String, String)>;

/// Mapping from metric name to its value cell.
///
/// Names are unique; the registry exclusively owns its metrics. Shared by
/// all caller threads and the dispatcher (at snapshot time only).
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, Metric>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Metric>> {
        // A poisoned lock means a panic elsewhere; the map itself is still
        // consistent (no operation leaves it half-updated).
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new metric with the given default value.
    ///
    /// Silent no-op if the name is already registered: first registration
    /// wins, even when the kinds differ. A kind conflict is logged so the
    /// latent `TypeMismatch` trap is observable.
    pub fn add_metric(&self, name: impl Into<String>, default: impl Into<Value>) {
        let name = name.into();
        let default = default.into();
        let mut entries = self.lock();
        if let Some(existing) = entries.get(&name) {
            if existing.kind() != default.kind() {
                tracing::warn!(
                    metric = %name,
                    registered = %existing.kind(),
                    requested = %default.kind(),
                    "duplicate registration with different kind ignored"
                );
            }
            return;
        }
        entries.insert(name.clone(), Metric::new(name, default));
    }

    /// Replace a metric's stored value.
    ///
    /// Fails with [`Error::NotFound`] for an unregistered name and
    /// [`Error::TypeMismatch`] when the value's kind differs from the
    /// registered kind. Neither failure mutates any metric state.
    pub fn update(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let mut entries = self.lock();
        let metric = entries
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        if metric.kind() != value.kind() {
            return Err(Error::TypeMismatch {
                name: name.to_string(),
                expected: metric.kind(),
                found: value.kind(),
            });
        }
        metric.set(value);
        Ok(())
    }

    /// Read the current value of a metric, if registered.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lock().get(name).map(|m| m.value().clone())
    }

    /// Atomically render every metric and reset it to its default.
    ///
    /// The registry-wide lock is held for the whole pass, so the returned
    /// batch reflects exactly one point-in-time state and every value
    /// reverts to its default immediately after being read. Batch order is
    /// arbitrary but each metric appears exactly once.
    pub fn snapshot_and_reset(&self) -> SnapshotBatch {
        let mut entries = self.lock();
        let mut batch = SnapshotBatch::with_capacity(entries.len());
        for metric in entries.values_mut() {
            batch.push((metric.name().to_string(), metric.render()));
            metric.reset();
        }
        batch
    }

    /// Remove one metric. Subsequent updates of this name fail with
    /// [`Error::NotFound`].
    pub fn remove_metric(&self, name: &str) -> Result<()> {
        match self.lock().remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(name.to_string())),
        }
    }

    /// Remove all metrics.
    pub fn clear_metrics(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
