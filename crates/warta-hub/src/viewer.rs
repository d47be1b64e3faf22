//! Viewer identity passed into every per-session operation.

use serde::{Deserialize, Serialize};

use warta_core::types::id::UserId;
use warta_entity::user::UserRole;

/// The authenticated dashboard user a session belongs to.
///
/// Carried into lifecycle writes and action dispatch so that every
/// operation knows *who* is acting and under *which* role the feed was
/// assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerContext {
    /// The viewer's user id.
    pub user_id: UserId,
    /// The viewer's role at session-open time.
    pub role: UserRole,
    /// Display name, embedded in status stamps and cascade messages.
    pub username: String,
}

impl ViewerContext {
    /// Creates a new viewer context.
    pub fn new(user_id: UserId, role: UserRole, username: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            username: username.into(),
        }
    }

    /// Whether this viewer's feed includes the role-broadcast query.
    pub fn receives_broadcasts(&self) -> bool {
        self.role.broadcast_eligible()
    }
}
