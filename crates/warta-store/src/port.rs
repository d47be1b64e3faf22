//! Store port consumed by the feed aggregator and lifecycle service.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use warta_core::result::AppResult;
use warta_core::types::id::NotificationId;
use warta_entity::notification::{NotificationDraft, NotificationPatch, NotificationRecord};

use crate::query::NotificationQuery;

/// Full result set of one query at one point in time, newest first.
pub type Snapshot = Arc<Vec<NotificationRecord>>;

/// Backend-agnostic notification store.
///
/// Writes are accepted in any order from any task. Every accepted write
/// re-emits a fresh snapshot to each live subscription whose result set
/// changed. Dropping a receiver is the only unsubscribe mechanism.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a live subscription for the query.
    ///
    /// The receiver starts out holding the current snapshot, so the first
    /// `borrow` is already complete without waiting for a change.
    async fn subscribe(&self, query: NotificationQuery) -> AppResult<watch::Receiver<Snapshot>>;

    /// Apply a patch to one record. Fails with `NotFound` if the record
    /// does not exist.
    async fn write_one(&self, id: NotificationId, patch: NotificationPatch) -> AppResult<()>;

    /// Apply patches to several records as a single atomic commit.
    ///
    /// Either every patch is applied or none is. Validation runs against
    /// the pre-write state of all targets before anything is committed.
    async fn write_batch(&self, writes: Vec<(NotificationId, NotificationPatch)>)
    -> AppResult<()>;

    /// Persist a new record from a draft and return its assigned id.
    async fn create(&self, draft: NotificationDraft) -> AppResult<NotificationId>;
}
