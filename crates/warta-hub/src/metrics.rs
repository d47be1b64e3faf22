//! Hub-level metrics counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-wide counters for the notification hub.
#[derive(Debug, Default)]
pub struct HubMetrics {
    /// Total sessions opened
    pub sessions_opened: AtomicU64,
    /// Total sessions closed
    pub sessions_closed: AtomicU64,
    /// Total feed snapshots published to viewers
    pub merges_published: AtomicU64,
    /// Total actions dispatched (any outcome)
    pub actions_dispatched: AtomicU64,
    /// Actions that failed after committing at least one effect
    pub partial_failures: AtomicU64,
    /// Cascade notifications created by dispatched actions
    pub cascades_created: AtomicU64,
}

impl HubMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn session_closed(&self) {
        self.sessions_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn merge_published(&self) {
        self.merges_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn action_dispatched(&self) {
        self.actions_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn partial_failure(&self) {
        self.partial_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cascades_created_count(&self, count: u64) {
        self.cascades_created.fetch_add(count, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_opened: self.sessions_opened.load(Ordering::Relaxed),
            sessions_closed: self.sessions_closed.load(Ordering::Relaxed),
            merges_published: self.merges_published.load(Ordering::Relaxed),
            actions_dispatched: self.actions_dispatched.load(Ordering::Relaxed),
            partial_failures: self.partial_failures.load(Ordering::Relaxed),
            cascades_created: self.cascades_created.load(Ordering::Relaxed),
        }
    }
}

/// Serializable counter snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub merges_published: u64,
    pub actions_dispatched: u64,
    pub partial_failures: u64,
    pub cascades_created: u64,
}
