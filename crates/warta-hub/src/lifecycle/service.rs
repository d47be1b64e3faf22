//! Lifecycle transitions applied through the store.

use std::sync::Arc;

use tracing::{debug, info};

use warta_core::result::AppResult;
use warta_entity::notification::NotificationRecord;
use warta_store::NotificationStore;

use crate::feed::FeedSnapshot;
use crate::viewer::ViewerContext;

use super::state;

/// Writes read/saved/hidden transitions for one viewer.
///
/// Every method either fully succeeds or fully fails; the feed updates
/// arrive through the viewer's subscription, never as a return value here.
#[derive(Debug, Clone)]
pub struct LifecycleService {
    store: Arc<dyn NotificationStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Marks the record read. Returns `false` when it already was.
    pub async fn acknowledge(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
    ) -> AppResult<bool> {
        let Some(patch) = state::acknowledge_patch(record, viewer.user_id) else {
            return Ok(false);
        };
        self.store.write_one(record.id, patch).await?;
        debug!(
            user_id = %viewer.user_id,
            notification_id = %record.id,
            "Notification marked read"
        );
        Ok(true)
    }

    /// Flips the saved flag and returns the new state.
    pub async fn toggle_saved(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
    ) -> AppResult<bool> {
        let (patch, saved) = state::save_toggle_patch(record, viewer.user_id);
        self.store.write_one(record.id, patch).await?;
        debug!(
            user_id = %viewer.user_id,
            notification_id = %record.id,
            saved,
            "Notification saved flag toggled"
        );
        Ok(saved)
    }

    /// Hides the record for this viewer. Returns `false` when it already
    /// was hidden.
    pub async fn hide(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
    ) -> AppResult<bool> {
        let Some(patch) = state::hide_patch(record, viewer.user_id) else {
            return Ok(false);
        };
        self.store.write_one(record.id, patch).await?;
        debug!(
            user_id = %viewer.user_id,
            notification_id = %record.id,
            "Notification hidden"
        );
        Ok(true)
    }

    /// Marks every unread record of the current view read in one atomic
    /// batch. Returns how many records were written.
    pub async fn mark_all_read(
        &self,
        viewer: &ViewerContext,
        view: &FeedSnapshot,
    ) -> AppResult<usize> {
        let writes = state::mark_all_read_patches(
            view.items.iter().map(|item| &item.record),
            viewer.user_id,
        );
        let count = writes.len();
        if count == 0 {
            return Ok(0);
        }
        self.store.write_batch(writes).await?;
        info!(user_id = %viewer.user_id, count, "Marked all visible notifications read");
        Ok(count)
    }
}
