//! Viewer-facing feed view model.

use serde::Serialize;

use warta_core::types::id::NotificationId;
use warta_entity::notification::NotificationRecord;

/// One notification as the session's viewer sees it.
///
/// `is_read` and `is_saved` are resolved against the viewer at merge time,
/// so the UI never has to inspect scope internals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub record: NotificationRecord,
    pub is_read: bool,
    pub is_saved: bool,
}

impl FeedItem {
    pub fn id(&self) -> NotificationId {
        self.record.id
    }
}

/// The merged feed at one point in time.
///
/// Saved items come first, then everything else, each group newest first.
/// The unread count covers exactly the items present here; hidden records
/// were dropped before counting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub items: Vec<FeedItem>,
    pub unread_count: usize,
}

impl FeedSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a visible item by record id.
    pub fn find(&self, id: NotificationId) -> Option<&FeedItem> {
        self.items.iter().find(|item| item.record.id == id)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.find(id).is_some()
    }

    /// Item ids in display order.
    pub fn ids(&self) -> Vec<NotificationId> {
        self.items.iter().map(FeedItem::id).collect()
    }
}
