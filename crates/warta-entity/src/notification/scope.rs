//! Notification scope: personal vs role-broadcast addressing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use warta_core::types::id::UserId;

use crate::user::UserRole;

/// Addressing scope of a notification, carrying the per-recipient state
/// in the shape that matches the scope.
///
/// A personal record has exactly one recipient, so read/saved are plain
/// flags owned by that recipient. A role-broadcast record is shared by
/// every viewer whose role matches, so read/saved are membership sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum NotificationScope {
    /// Addressed to exactly one recipient.
    Personal {
        /// The single intended recipient.
        recipient_id: UserId,
        /// Whether the recipient has read the notification.
        #[serde(default)]
        read: bool,
        /// Whether the recipient has saved the notification.
        #[serde(default)]
        saved: bool,
    },
    /// Addressed to every viewer whose role matches `target_role`.
    RoleBroadcast {
        /// The role this broadcast targets.
        target_role: UserRole,
        /// Viewers who have read the notification.
        #[serde(default)]
        read_by: HashSet<UserId>,
        /// Viewers who have saved the notification.
        #[serde(default)]
        saved_by: HashSet<UserId>,
    },
}

impl NotificationScope {
    /// Creates a fresh personal scope (unread, unsaved).
    pub fn personal(recipient_id: UserId) -> Self {
        Self::Personal {
            recipient_id,
            read: false,
            saved: false,
        }
    }

    /// Creates a fresh role-broadcast scope (no members in any set).
    pub fn broadcast(target_role: UserRole) -> Self {
        Self::RoleBroadcast {
            target_role,
            read_by: HashSet::new(),
            saved_by: HashSet::new(),
        }
    }

    /// Whether this is a personal scope.
    pub fn is_personal(&self) -> bool {
        matches!(self, Self::Personal { .. })
    }

    /// The single recipient, for personal scopes.
    pub fn recipient_id(&self) -> Option<UserId> {
        match self {
            Self::Personal { recipient_id, .. } => Some(*recipient_id),
            Self::RoleBroadcast { .. } => None,
        }
    }

    /// The targeted role, for broadcast scopes.
    pub fn target_role(&self) -> Option<UserRole> {
        match self {
            Self::Personal { .. } => None,
            Self::RoleBroadcast { target_role, .. } => Some(*target_role),
        }
    }
}
