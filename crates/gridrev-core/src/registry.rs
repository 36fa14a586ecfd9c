//! The concurrent registry of managed regions.
//!
//! Registration calls arrive from region-startup threads and can race with
//! iteration during commit/rollback/diff fan-out on the dispatch-loop task,
//! so the registry guards its map with a mutex and hands out copy-on-read
//! snapshots for iteration. Regions are registered once and never removed;
//! session teardown only detaches that session's event subscriptions.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use gridrev_types::{RegionId, RegionInfo};
use tracing::debug;

/// Errors from registry mutation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The region is already registered.
    #[error("region already registered: {0}")]
    DuplicateRegion(RegionId),
}

/// Append-only set of regions under content management.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    inner: Mutex<BTreeMap<RegionId, RegionInfo>>,
}

impl RegionRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a new region for revisioning.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRegion`] if the region is already
    /// registered.
    pub fn register(&self, info: RegionInfo) -> Result<(), RegistryError> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&info.id) {
            return Err(RegistryError::DuplicateRegion(info.id));
        }
        debug!(region = %info.id, name = info.name, "Registering new region");
        map.insert(info.id, info);
        Ok(())
    }

    /// Look up one region's descriptor.
    pub fn get(&self, id: RegionId) -> Option<RegionInfo> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Whether the region is registered.
    pub fn contains(&self, id: RegionId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Copy-on-read snapshot of every registered region, in registry order.
    /// Fan-out iteration works on the snapshot so registration can proceed
    /// concurrently.
    pub fn snapshot(&self) -> Vec<RegionInfo> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
