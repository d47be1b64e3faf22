//! Actor/time metadata attached to domain-record mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// Records who performed a status mutation and when.
///
/// Attached to every gateway mutation (decree verification, budget
/// decisions) so downstream records carry the acting official's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusStamp {
    /// The acting user's ID.
    pub actor_id: UserId,
    /// The acting user's display name (embedded in cascade messages).
    pub actor_name: String,
    /// When the mutation was performed.
    pub at: DateTime<Utc>,
    /// Optional free-form note (e.g., a rejection reason).
    pub note: Option<String>,
}

impl StatusStamp {
    /// Creates a stamp for the given actor at the current time.
    pub fn now(actor_id: UserId, actor_name: impl Into<String>) -> Self {
        Self {
            actor_id,
            actor_name: actor_name.into(),
            at: Utc::now(),
            note: None,
        }
    }

    /// Attaches a note to the stamp.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
