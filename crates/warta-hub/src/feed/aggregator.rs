//! Live feed aggregation task.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use warta_core::result::AppResult;
use warta_core::types::id::NotificationId;
use warta_store::{NotificationQuery, NotificationStore, Snapshot};

use crate::metrics::HubMetrics;
use crate::viewer::ViewerContext;

use super::merge::merge_feed;
use super::view::{FeedItem, FeedSnapshot};

/// Merges a viewer's live queries into one published feed view.
///
/// The personal query is always installed; the role-broadcast query only
/// for broadcast-eligible roles. Each store delivery wholesale-replaces
/// that query's cache and triggers one recompute. Both caches die with the
/// aggregator, so a viewer can never observe another viewer's state.
#[derive(Debug)]
pub struct FeedAggregator {
    view_rx: watch::Receiver<FeedSnapshot>,
    cancel_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedAggregator {
    /// Subscribes the viewer's queries, computes the initial view, and
    /// spawns the pump task.
    ///
    /// The initial view is complete before this returns, so `current()`
    /// right after session open already reflects the store.
    pub async fn start(
        viewer: ViewerContext,
        store: Arc<dyn NotificationStore>,
        metrics: Arc<HubMetrics>,
    ) -> AppResult<Self> {
        let mut personal_rx = store
            .subscribe(NotificationQuery::personal(viewer.user_id))
            .await?;
        let mut broadcast_rx = if viewer.receives_broadcasts() {
            Some(store.subscribe(NotificationQuery::broadcast(viewer.role)).await?)
        } else {
            None
        };

        let personal_cache = personal_rx.borrow_and_update().clone();
        let broadcast_cache = match broadcast_rx.as_mut() {
            Some(rx) => rx.borrow_and_update().clone(),
            None => Snapshot::default(),
        };

        let initial = merge_feed(&viewer, &personal_cache, &broadcast_cache);
        metrics.merge_published();
        debug!(
            user_id = %viewer.user_id,
            role = %viewer.role,
            broadcast = broadcast_rx.is_some(),
            total = initial.len(),
            unread = initial.unread_count,
            "Feed aggregator started"
        );

        let (view_tx, view_rx) = watch::channel(initial);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let pump = FeedPump {
            viewer,
            personal_rx,
            broadcast_rx,
            personal_cache,
            broadcast_cache,
            view_tx,
            metrics,
        };
        let task = tokio::spawn(pump.run(cancel_rx));

        Ok(Self {
            view_rx,
            cancel_tx,
            task: Mutex::new(Some(task)),
        })
    }

    /// The latest merged view.
    pub fn current(&self) -> FeedSnapshot {
        self.view_rx.borrow().clone()
    }

    /// A receiver that observes every published view.
    pub fn watch_view(&self) -> watch::Receiver<FeedSnapshot> {
        self.view_rx.clone()
    }

    /// Finds a record in the current view, if the viewer can see it.
    pub fn find_visible(&self, id: NotificationId) -> Option<FeedItem> {
        self.view_rx.borrow().find(id).cloned()
    }

    /// Cancels the pump task and waits for it to finish.
    ///
    /// Dropping the pump drops both store subscriptions, which is the
    /// store-side unsubscribe.
    pub async fn shutdown(&self) {
        let _ = self.cancel_tx.send(true);
        if let Some(task) = self.task.lock().await.take() {
            if let Err(error) = task.await {
                warn!(error = %error, "Feed aggregator task aborted");
            }
        }
    }
}

struct FeedPump {
    viewer: ViewerContext,
    personal_rx: watch::Receiver<Snapshot>,
    broadcast_rx: Option<watch::Receiver<Snapshot>>,
    personal_cache: Snapshot,
    broadcast_cache: Snapshot,
    view_tx: watch::Sender<FeedSnapshot>,
    metrics: Arc<HubMetrics>,
}

impl FeedPump {
    async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                changed = self.personal_rx.changed() => {
                    match changed {
                        Ok(()) => {
                            self.personal_cache = self.personal_rx.borrow_and_update().clone();
                            self.republish();
                        }
                        Err(_) => {
                            warn!(user_id = %self.viewer.user_id, "Personal query closed, feed frozen");
                            break;
                        }
                    }
                }
                changed = changed_or_pending(self.broadcast_rx.as_mut()) => {
                    match changed {
                        Ok(()) => {
                            if let Some(rx) = self.broadcast_rx.as_mut() {
                                self.broadcast_cache = rx.borrow_and_update().clone();
                            }
                            self.republish();
                        }
                        Err(_) => {
                            warn!(user_id = %self.viewer.user_id, "Broadcast query closed, feed frozen");
                            break;
                        }
                    }
                }
            }
        }
        trace!(user_id = %self.viewer.user_id, "Feed aggregator stopped");
    }

    fn republish(&self) {
        let snapshot = merge_feed(&self.viewer, &self.personal_cache, &self.broadcast_cache);
        let total = snapshot.len();
        let unread = snapshot.unread_count;
        let published = self.view_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
        if published {
            self.metrics.merge_published();
            trace!(user_id = %self.viewer.user_id, total, unread, "Republished feed view");
        }
    }
}

/// Waits for a delivery on the broadcast query, or forever when the viewer
/// has none.
async fn changed_or_pending(
    rx: Option<&mut watch::Receiver<Snapshot>>,
) -> Result<(), watch::error::RecvError> {
    match rx {
        Some(rx) => rx.changed().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use warta_entity::notification::{NotificationDraft, NotificationKind};
    use warta_entity::user::UserRole;
    use warta_store::MemoryNotificationStore;

    use warta_core::types::id::UserId;

    use super::*;

    fn make_viewer(role: UserRole) -> ViewerContext {
        ViewerContext::new(UserId::new(), role, "andi")
    }

    async fn make_aggregator(
        viewer: &ViewerContext,
        store: &Arc<MemoryNotificationStore>,
    ) -> FeedAggregator {
        let store: Arc<dyn NotificationStore> = store.clone();
        FeedAggregator::start(viewer.clone(), store, Arc::new(HubMetrics::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initial_view_is_ready_without_waiting() {
        let store = Arc::new(MemoryNotificationStore::new());
        let viewer = make_viewer(UserRole::Staff);
        store
            .create(NotificationDraft::personal(
                viewer.user_id,
                NotificationKind::Generic,
                "seeded",
                "m",
            ))
            .await
            .unwrap();

        let aggregator = make_aggregator(&viewer, &store).await;

        let view = aggregator.current();
        assert_eq!(view.len(), 1);
        assert_eq!(view.unread_count, 1);
        aggregator.shutdown().await;
    }

    #[tokio::test]
    async fn test_ineligible_role_sees_no_broadcasts() {
        let store = Arc::new(MemoryNotificationStore::new());
        let viewer = make_viewer(UserRole::Staff);
        store
            .create(NotificationDraft::broadcast(
                UserRole::Treasurer,
                NotificationKind::Generic,
                "broadcast",
                "m",
            ))
            .await
            .unwrap();
        store
            .create(NotificationDraft::personal(
                viewer.user_id,
                NotificationKind::Generic,
                "personal",
                "m",
            ))
            .await
            .unwrap();

        let aggregator = make_aggregator(&viewer, &store).await;

        let view = aggregator.current();
        assert_eq!(view.len(), 1);
        assert_eq!(view.items[0].record.title, "personal");
        aggregator.shutdown().await;
    }

    #[tokio::test]
    async fn test_delivery_replaces_view() {
        let store = Arc::new(MemoryNotificationStore::new());
        let viewer = make_viewer(UserRole::Treasurer);
        let aggregator = make_aggregator(&viewer, &store).await;
        let mut view_rx = aggregator.watch_view();

        store
            .create(NotificationDraft::broadcast(
                UserRole::Treasurer,
                NotificationKind::Generic,
                "for treasurers",
                "m",
            ))
            .await
            .unwrap();

        view_rx.changed().await.unwrap();
        let view = view_rx.borrow().clone();
        assert_eq!(view.len(), 1);
        assert_eq!(view.items[0].record.title, "for treasurers");
        aggregator.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_releases_store_subscriptions() {
        let store = Arc::new(MemoryNotificationStore::new());
        let viewer = make_viewer(UserRole::VillageHead);
        let aggregator = make_aggregator(&viewer, &store).await;
        assert_eq!(store.watcher_count().await, 2);

        aggregator.shutdown().await;

        // Pruning happens on the next write.
        store
            .create(NotificationDraft::personal(
                UserId::new(),
                NotificationKind::Generic,
                "t",
                "m",
            ))
            .await
            .unwrap();
        assert_eq!(store.watcher_count().await, 0);
    }
}
