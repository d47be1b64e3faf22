//! In-memory notification store backed by a watch channel per subscription.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tokio::sync::watch;
use tracing::debug;

use warta_core::error::AppError;
use warta_core::result::AppResult;
use warta_core::types::id::NotificationId;
use warta_entity::notification::{NotificationDraft, NotificationPatch, NotificationRecord};

use crate::port::{NotificationStore, Snapshot};
use crate::query::NotificationQuery;

/// Single-node in-memory store.
///
/// Every committed write re-evaluates each live query and publishes a new
/// snapshot only when the result set actually changed. Receivers that were
/// dropped are pruned on the next write.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    records: HashMap<NotificationId, NotificationRecord>,
    watchers: Vec<QueryWatcher>,
}

#[derive(Debug)]
struct QueryWatcher {
    query: NotificationQuery,
    tx: watch::Sender<Snapshot>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one record by id.
    pub async fn get(&self, id: NotificationId) -> Option<NotificationRecord> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// All records regardless of addressing, newest first.
    pub async fn all_records(&self) -> Vec<NotificationRecord> {
        let inner = self.inner.read().await;
        let mut records: Vec<_> = inner.records.values().cloned().collect();
        sort_newest_first(&mut records);
        records
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }

    /// Number of live subscriptions (after pruning on the last write).
    pub async fn watcher_count(&self) -> usize {
        self.inner.read().await.watchers.len()
    }

    fn snapshot_for(records: &HashMap<NotificationId, NotificationRecord>, query: &NotificationQuery) -> Snapshot {
        let mut matching: Vec<_> = records
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        Arc::new(matching)
    }

    /// Re-evaluate every live query against the current record set.
    fn publish(inner: &mut StoreInner) {
        inner.watchers.retain(|watcher| !watcher.tx.is_closed());
        for watcher in &inner.watchers {
            let snapshot = Self::snapshot_for(&inner.records, &watcher.query);
            watcher.tx.send_if_modified(|current| {
                if *current == snapshot {
                    false
                } else {
                    *current = snapshot;
                    true
                }
            });
        }
    }
}

fn sort_newest_first(records: &mut [NotificationRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn subscribe(&self, query: NotificationQuery) -> AppResult<watch::Receiver<Snapshot>> {
        let mut inner = self.inner.write().await;
        let initial = Self::snapshot_for(&inner.records, &query);
        let (tx, rx) = watch::channel(initial);
        inner.watchers.push(QueryWatcher { query, tx });
        debug!(?query, watchers = inner.watchers.len(), "Opened store subscription");
        Ok(rx)
    }

    async fn write_one(&self, id: NotificationId, patch: NotificationPatch) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let mut staged = inner
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("notification {id} not found")))?;
        patch.apply(&mut staged)?;
        inner.records.insert(id, staged);
        Self::publish(&mut inner);
        debug!(notification_id = %id, "Applied notification patch");
        Ok(())
    }

    async fn write_batch(&self, writes: Vec<(NotificationId, NotificationPatch)>) -> AppResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut inner = self.inner.write().await;

        // Stage every patch on clones first so a failure anywhere leaves
        // the committed state untouched. Later patches for the same record
        // compound on the staged clone.
        let mut staged: HashMap<NotificationId, NotificationRecord> = HashMap::new();
        for (id, patch) in &writes {
            if !staged.contains_key(id) {
                let record = inner
                    .records
                    .get(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found(format!("notification {id} not found")))?;
                staged.insert(*id, record);
            }
            if let Some(record) = staged.get_mut(id) {
                patch.apply(record)?;
            }
        }

        let count = staged.len();
        for (id, record) in staged {
            inner.records.insert(id, record);
        }
        Self::publish(&mut inner);
        debug!(records = count, writes = writes.len(), "Committed batch write");
        Ok(())
    }

    async fn create(&self, draft: NotificationDraft) -> AppResult<NotificationId> {
        let mut inner = self.inner.write().await;
        let id = NotificationId::new();
        let record = draft.into_record(id, Utc::now());
        debug!(notification_id = %id, kind = %record.kind, "Created notification");
        inner.records.insert(id, record);
        Self::publish(&mut inner);
        Ok(id)
    }
}
