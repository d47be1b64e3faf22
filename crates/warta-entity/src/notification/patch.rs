//! Partial-update operations for notification records.
//!
//! Membership fields are only ever mutated through set-add/set-remove
//! primitives, never by replacing the whole set, so concurrent viewers
//! cannot lose each other's updates.

use serde::{Deserialize, Serialize};

use warta_core::error::AppError;
use warta_core::result::AppResult;
use warta_core::types::id::UserId;

use super::model::NotificationRecord;
use super::scope::NotificationScope;

/// A single field-level update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    /// Set the scalar read flag (personal records only).
    SetRead(bool),
    /// Set the scalar saved flag (personal records only).
    SetSaved(bool),
    /// Add a viewer to the read-by set (broadcast records only).
    AddReadBy(UserId),
    /// Add a viewer to the saved-by set (broadcast records only).
    AddSavedBy(UserId),
    /// Remove a viewer from the saved-by set (broadcast records only).
    RemoveSavedBy(UserId),
    /// Add a viewer to the hidden-for set (both scopes). There is no
    /// reverse operation: hiding is permanent per viewer.
    AddHiddenFor(UserId),
}

/// An ordered list of partial-update operations applied to one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPatch {
    ops: Vec<PatchOp>,
}

impl NotificationPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the personal read flag.
    pub fn set_read(mut self, read: bool) -> Self {
        self.ops.push(PatchOp::SetRead(read));
        self
    }

    /// Sets the personal saved flag.
    pub fn set_saved(mut self, saved: bool) -> Self {
        self.ops.push(PatchOp::SetSaved(saved));
        self
    }

    /// Adds a viewer to the read-by membership set.
    pub fn add_read_by(mut self, user_id: UserId) -> Self {
        self.ops.push(PatchOp::AddReadBy(user_id));
        self
    }

    /// Adds a viewer to the saved-by membership set.
    pub fn add_saved_by(mut self, user_id: UserId) -> Self {
        self.ops.push(PatchOp::AddSavedBy(user_id));
        self
    }

    /// Removes a viewer from the saved-by membership set.
    pub fn remove_saved_by(mut self, user_id: UserId) -> Self {
        self.ops.push(PatchOp::RemoveSavedBy(user_id));
        self
    }

    /// Adds a viewer to the hidden-for set.
    pub fn add_hidden_for(mut self, user_id: UserId) -> Self {
        self.ops.push(PatchOp::AddHiddenFor(user_id));
        self
    }

    /// The operations in application order.
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Whether the patch carries no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every operation to the record in order.
    ///
    /// Scalar ops against a broadcast record (or membership ops against a
    /// personal record) are rejected with a validation error, leaving the
    /// record untouched by that op. Membership adds/removes are idempotent.
    pub fn apply(&self, record: &mut NotificationRecord) -> AppResult<()> {
        for op in &self.ops {
            match (op, &mut record.scope) {
                (PatchOp::SetRead(value), NotificationScope::Personal { read, .. }) => {
                    *read = *value;
                }
                (PatchOp::SetSaved(value), NotificationScope::Personal { saved, .. }) => {
                    *saved = *value;
                }
                (PatchOp::AddReadBy(user), NotificationScope::RoleBroadcast { read_by, .. }) => {
                    read_by.insert(*user);
                }
                (PatchOp::AddSavedBy(user), NotificationScope::RoleBroadcast { saved_by, .. }) => {
                    saved_by.insert(*user);
                }
                (
                    PatchOp::RemoveSavedBy(user),
                    NotificationScope::RoleBroadcast { saved_by, .. },
                ) => {
                    saved_by.remove(user);
                }
                (PatchOp::AddHiddenFor(user), _) => {
                    record.hidden_for.insert(*user);
                }
                (op, _) => {
                    return Err(AppError::validation(format!(
                        "patch op {op:?} does not match record scope for notification {}",
                        record.id
                    )));
                }
            }
        }
        Ok(())
    }
}
