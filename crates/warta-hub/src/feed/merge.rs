//! Pure feed recompute.

use warta_entity::notification::NotificationRecord;

use crate::viewer::ViewerContext;

use super::view::{FeedItem, FeedSnapshot};

/// Rebuilds the viewer's feed from the two query caches.
///
/// There is no incremental patching: the output is a full function of the
/// inputs, so a delivery can never leave the feed in a mixed state. Records
/// hidden for the viewer are dropped before annotation and counting. Saved
/// items sort above unsaved regardless of age; within each group, newest
/// first with the record id as the final tie-break.
pub fn merge_feed(
    viewer: &ViewerContext,
    personal: &[NotificationRecord],
    broadcast: &[NotificationRecord],
) -> FeedSnapshot {
    let mut items: Vec<FeedItem> = personal
        .iter()
        .chain(broadcast.iter())
        .filter(|record| !record.is_hidden_for(viewer.user_id))
        .map(|record| FeedItem {
            is_read: record.is_read_by(viewer.user_id),
            is_saved: record.is_saved_by(viewer.user_id),
            record: record.clone(),
        })
        .collect();

    items.sort_by(|a, b| {
        b.is_saved
            .cmp(&a.is_saved)
            .then_with(|| b.record.created_at.cmp(&a.record.created_at))
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    let unread_count = items.iter().filter(|item| !item.is_read).count();

    FeedSnapshot {
        items,
        unread_count,
    }
}
