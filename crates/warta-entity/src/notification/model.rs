//! Notification entity model.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warta_core::types::id::{NotificationId, UserId};

use crate::user::UserRole;

use super::kind::NotificationKind;
use super::payload::ActionPayload;
use super::scope::NotificationScope;

/// A notification document in the shared store.
///
/// Records are never hard-deleted by the hub: a normal delete action only
/// adds the viewer to `hidden_for`, which permanently excludes the record
/// from that viewer's aggregated view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Unique notification identifier, assigned by the store on creation.
    pub id: NotificationId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Addressing scope, carrying the per-recipient read/saved state.
    pub scope: NotificationScope,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Navigation target handed to the navigator on acknowledge.
    pub link: Option<String>,
    /// Kind-specific action payload (if the kind carries an action).
    pub payload: Option<ActionPayload>,
    /// Viewers for whom this record is soft-deleted.
    #[serde(default)]
    pub hidden_for: HashSet<UserId>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Whether the given viewer has read this notification.
    pub fn is_read_by(&self, user_id: UserId) -> bool {
        match &self.scope {
            NotificationScope::Personal { read, .. } => *read,
            NotificationScope::RoleBroadcast { read_by, .. } => read_by.contains(&user_id),
        }
    }

    /// Whether the given viewer has saved this notification.
    pub fn is_saved_by(&self, user_id: UserId) -> bool {
        match &self.scope {
            NotificationScope::Personal { saved, .. } => *saved,
            NotificationScope::RoleBroadcast { saved_by, .. } => saved_by.contains(&user_id),
        }
    }

    /// Whether this record is soft-deleted for the given viewer.
    pub fn is_hidden_for(&self, user_id: UserId) -> bool {
        self.hidden_for.contains(&user_id)
    }

    /// Whether this record addresses the given viewer, by either scope.
    pub fn is_addressed_to(&self, user_id: UserId, role: UserRole) -> bool {
        match &self.scope {
            NotificationScope::Personal { recipient_id, .. } => *recipient_id == user_id,
            NotificationScope::RoleBroadcast { target_role, .. } => *target_role == role,
        }
    }
}

/// A notification about to be created: a record minus the store-assigned
/// fields.
///
/// The store assigns the `id` and stamps `created_at` when the draft does
/// not carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    /// Notification kind.
    pub kind: NotificationKind,
    /// Addressing scope (with fresh per-recipient state).
    pub scope: NotificationScope,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Navigation target.
    pub link: Option<String>,
    /// Kind-specific action payload.
    pub payload: Option<ActionPayload>,
    /// Creation timestamp; stamped by the store when `None`.
    pub created_at: Option<DateTime<Utc>>,
}

impl NotificationDraft {
    /// Creates a draft addressed to a single recipient.
    pub fn personal(
        recipient_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            scope: NotificationScope::personal(recipient_id),
            title: title.into(),
            message: message.into(),
            link: None,
            payload: None,
            created_at: None,
        }
    }

    /// Creates a draft broadcast to every viewer of a role.
    pub fn broadcast(
        target_role: UserRole,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            scope: NotificationScope::broadcast(target_role),
            title: title.into(),
            message: message.into(),
            link: None,
            payload: None,
            created_at: None,
        }
    }

    /// Sets the navigation link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Sets the action payload.
    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets an explicit creation timestamp (imports, backfills).
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Materializes the draft into a record with the given id, stamping
    /// `created_at` with `now` when the draft carries none.
    pub fn into_record(self, id: NotificationId, now: DateTime<Utc>) -> NotificationRecord {
        NotificationRecord {
            id,
            kind: self.kind,
            scope: self.scope,
            title: self.title,
            message: self.message,
            link: self.link,
            payload: self.payload,
            hidden_for: HashSet::new(),
            created_at: self.created_at.unwrap_or(now),
        }
    }
}
