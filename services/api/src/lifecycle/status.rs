//! Status Reporting
//!
//! Read-only queries over the session registry, backing the health and
//! status endpoints. Snapshots are point-in-time and may be stale by the
//! time a caller acts on them; no compare-and-act contract is offered.

use super::registry::SessionRegistry;
use std::sync::Arc;

/// A point-in-time view of the active sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub active_calls: Vec<String>,
    pub total_active: usize,
}

/// Read-only reporting facade over the registry.
#[derive(Clone)]
pub struct StatusReporter {
    registry: Arc<SessionRegistry>,
}

impl StatusReporter {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Number of currently active agent sessions.
    pub fn active_count(&self) -> usize {
        self.registry.count()
    }

    /// Snapshot of the active sessions. The count is derived from the same
    /// snapshot as the call list, so the two always agree.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let active_calls = self.registry.active_calls();
        RegistrySnapshot {
            total_active: active_calls.len(),
            active_calls,
        }
    }
}
