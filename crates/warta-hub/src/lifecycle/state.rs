//! Pure state derivation and transition patch builders.
//!
//! Transitions are expressed as [`NotificationPatch`] values so the store
//! applies them through its set primitives. A builder returning `None`
//! means the record is already in the requested state and no write should
//! be issued.

use warta_core::types::id::{NotificationId, UserId};
use warta_entity::notification::{NotificationPatch, NotificationRecord, NotificationScope};

/// How one viewer currently sees one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// Permanently out of this viewer's feed.
    Hidden,
    /// Visible, with the viewer's read and saved flags resolved.
    Active { read: bool, saved: bool },
}

/// Derives the viewer's state for a record. Hidden wins over everything.
pub fn viewer_state(record: &NotificationRecord, viewer: UserId) -> ViewerState {
    if record.is_hidden_for(viewer) {
        ViewerState::Hidden
    } else {
        ViewerState::Active {
            read: record.is_read_by(viewer),
            saved: record.is_saved_by(viewer),
        }
    }
}

/// Marks the record read for the viewer. `None` when already read.
pub fn acknowledge_patch(record: &NotificationRecord, viewer: UserId) -> Option<NotificationPatch> {
    if record.is_read_by(viewer) {
        return None;
    }
    Some(read_patch(record, viewer))
}

/// Flips the viewer's saved flag. Returns the patch and the resulting
/// saved state. Saving never touches the read flag.
pub fn save_toggle_patch(record: &NotificationRecord, viewer: UserId) -> (NotificationPatch, bool) {
    let currently_saved = record.is_saved_by(viewer);
    let patch = match (&record.scope, currently_saved) {
        (NotificationScope::Personal { .. }, _) => {
            NotificationPatch::new().set_saved(!currently_saved)
        }
        (NotificationScope::RoleBroadcast { .. }, false) => {
            NotificationPatch::new().add_saved_by(viewer)
        }
        (NotificationScope::RoleBroadcast { .. }, true) => {
            NotificationPatch::new().remove_saved_by(viewer)
        }
    };
    (patch, !currently_saved)
}

/// Hides the record for the viewer. `None` when already hidden. There is
/// no inverse transition.
pub fn hide_patch(record: &NotificationRecord, viewer: UserId) -> Option<NotificationPatch> {
    if record.is_hidden_for(viewer) {
        return None;
    }
    Some(NotificationPatch::new().add_hidden_for(viewer))
}

/// Read patches for every record the viewer has not read yet, ready for a
/// single batch write. Callers pass the records of the current visible
/// view, so hidden records never end up here.
pub fn mark_all_read_patches<'a, I>(
    records: I,
    viewer: UserId,
) -> Vec<(NotificationId, NotificationPatch)>
where
    I: IntoIterator<Item = &'a NotificationRecord>,
{
    records
        .into_iter()
        .filter(|record| !record.is_read_by(viewer))
        .map(|record| (record.id, read_patch(record, viewer)))
        .collect()
}

fn read_patch(record: &NotificationRecord, viewer: UserId) -> NotificationPatch {
    match &record.scope {
        NotificationScope::Personal { .. } => NotificationPatch::new().set_read(true),
        NotificationScope::RoleBroadcast { .. } => NotificationPatch::new().add_read_by(viewer),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use warta_entity::notification::{NotificationDraft, NotificationKind};
    use warta_entity::user::UserRole;

    use super::*;

    fn personal_record(recipient: UserId) -> NotificationRecord {
        NotificationDraft::personal(recipient, NotificationKind::Generic, "T", "M")
            .into_record(NotificationId::new(), Utc::now())
    }

    fn broadcast_record() -> NotificationRecord {
        NotificationDraft::broadcast(UserRole::Treasurer, NotificationKind::Generic, "T", "M")
            .into_record(NotificationId::new(), Utc::now())
    }

    #[test]
    fn test_acknowledge_is_noop_when_already_read() {
        let viewer = UserId::new();
        let mut record = personal_record(viewer);

        let patch = acknowledge_patch(&record, viewer).unwrap();
        patch.apply(&mut record).unwrap();

        assert!(record.is_read_by(viewer));
        assert!(acknowledge_patch(&record, viewer).is_none());
    }

    #[test]
    fn test_acknowledge_targets_membership_on_broadcasts() {
        let viewer = UserId::new();
        let other = UserId::new();
        let mut record = broadcast_record();

        let patch = acknowledge_patch(&record, viewer).unwrap();
        patch.apply(&mut record).unwrap();

        assert!(record.is_read_by(viewer));
        assert!(!record.is_read_by(other));
        assert!(acknowledge_patch(&record, other).is_some());
    }

    #[test]
    fn test_save_toggle_round_trip_does_not_touch_read() {
        let viewer = UserId::new();
        let mut record = broadcast_record();

        let (patch, saved) = save_toggle_patch(&record, viewer);
        assert!(saved);
        patch.apply(&mut record).unwrap();
        assert!(record.is_saved_by(viewer));
        assert!(!record.is_read_by(viewer));

        let (patch, saved) = save_toggle_patch(&record, viewer);
        assert!(!saved);
        patch.apply(&mut record).unwrap();
        assert!(!record.is_saved_by(viewer));
    }

    #[test]
    fn test_hide_is_terminal_and_idempotent() {
        let viewer = UserId::new();
        let mut record = personal_record(viewer);

        let patch = hide_patch(&record, viewer).unwrap();
        patch.apply(&mut record).unwrap();

        assert_eq!(viewer_state(&record, viewer), ViewerState::Hidden);
        assert!(hide_patch(&record, viewer).is_none());
    }

    #[test]
    fn test_hidden_wins_over_flags_in_state_derivation() {
        let viewer = UserId::new();
        let mut record = personal_record(viewer);
        NotificationPatch::new()
            .set_read(true)
            .add_hidden_for(viewer)
            .apply(&mut record)
            .unwrap();

        assert_eq!(viewer_state(&record, viewer), ViewerState::Hidden);
    }

    #[test]
    fn test_mark_all_read_skips_already_read() {
        let viewer = UserId::new();
        let mut read_one = personal_record(viewer);
        NotificationPatch::new().set_read(true).apply(&mut read_one).unwrap();
        let unread_personal = personal_record(viewer);
        let unread_broadcast = broadcast_record();
        let records = [read_one, unread_personal.clone(), unread_broadcast.clone()];

        let writes = mark_all_read_patches(records.iter(), viewer);

        assert_eq!(writes.len(), 2);
        let ids: Vec<_> = writes.iter().map(|(id, _)| *id).collect();
        assert!(ids.contains(&unread_personal.id));
        assert!(ids.contains(&unread_broadcast.id));
    }
}
