//! Session Registry
//!
//! Concurrent mapping from call identifier to the active [`SessionHandle`].
//! Presence of a key is the sole source of truth for "an agent is active for
//! this call"; all mutation goes through the operations here, never through
//! the underlying map directly.

use super::session::SessionHandle;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Registry of active agent sessions, keyed by call id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Inserts `handle` under its call id if no session is registered there.
    ///
    /// Returns `false` and leaves the registry unchanged when an entry
    /// already exists. The check-and-insert is a single atomic operation on
    /// the map shard, so concurrent inserts for one call id never both
    /// succeed.
    pub fn insert(&self, handle: Arc<SessionHandle>) -> bool {
        match self.sessions.entry(handle.call_id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(handle);
                true
            }
        }
    }

    /// Removes and returns the entry for `call_id`.
    ///
    /// Idempotent: removing an absent key is a no-op returning `None`.
    pub fn remove(&self, call_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.remove(call_id).map(|(_, handle)| handle)
    }

    /// Read-only lookup of the active session for `call_id`.
    pub fn get(&self, call_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions
            .get(call_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of the currently active call identifiers, in no particular
    /// order.
    pub fn active_calls(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of active sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}
