//! Session subscription bookkeeping.
//!
//! When a viewer session joins a managed region, the integration layer
//! attaches its event callbacks to the controller's work queue and records
//! the attachment here. On departure, [`detach`] removes exactly that
//! session's entry so teardown is deterministic. Detaching a session never
//! deregisters its region: regions stay under management for the lifetime
//! of the process.
//!
//! [`detach`]: SessionTable::detach

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use gridrev_types::{RegionId, SessionId};
use tracing::debug;

/// Which sessions currently have event subscriptions attached, and in
/// which region each was attached.
#[derive(Debug, Default)]
pub struct SessionTable {
    inner: Mutex<BTreeMap<SessionId, RegionId>>,
}

impl SessionTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record that a session's callbacks were attached in `region`.
    /// Re-attaching an existing session updates its region.
    pub fn attach(&self, session: SessionId, region: RegionId) {
        debug!(%session, %region, "Attaching session subscriptions");
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session, region);
    }

    /// Remove a session's entry, returning the region it was attached in.
    /// Returns `None` if the session was not attached.
    pub fn detach(&self, session: SessionId) -> Option<RegionId> {
        let removed = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session);
        if let Some(region) = removed {
            debug!(%session, %region, "Detached session subscriptions");
        }
        removed
    }

    /// Whether the session currently has subscriptions attached.
    pub fn is_attached(&self, session: SessionId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&session)
    }

    /// Number of attached sessions.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sessions are attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
