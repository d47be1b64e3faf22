//! Live query selectors for notification subscriptions.

use serde::{Deserialize, Serialize};

use warta_core::types::id::UserId;
use warta_entity::notification::{NotificationRecord, NotificationScope};
use warta_entity::user::UserRole;

/// Selects which records a subscription observes.
///
/// A query matches on addressing only. Per-viewer hiding is applied by
/// the consumer, so a record stays in the snapshot even after the viewer
/// hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum NotificationQuery {
    /// Personal records addressed to one recipient.
    Personal { recipient_id: UserId },
    /// Role broadcasts targeting one role.
    Broadcast { role: UserRole },
}

impl NotificationQuery {
    pub fn personal(recipient_id: UserId) -> Self {
        Self::Personal { recipient_id }
    }

    pub fn broadcast(role: UserRole) -> Self {
        Self::Broadcast { role }
    }

    /// Whether the record belongs to this query's result set.
    pub fn matches(&self, record: &NotificationRecord) -> bool {
        match (self, &record.scope) {
            (Self::Personal { recipient_id }, NotificationScope::Personal { recipient_id: r, .. }) => {
                recipient_id == r
            }
            (Self::Broadcast { role }, NotificationScope::RoleBroadcast { target_role, .. }) => {
                role == target_role
            }
            _ => false,
        }
    }
}
