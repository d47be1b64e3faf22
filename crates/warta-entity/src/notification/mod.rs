//! Notification domain entities.

pub mod kind;
pub mod model;
pub mod patch;
pub mod payload;
pub mod scope;

pub use kind::NotificationKind;
pub use model::{NotificationDraft, NotificationRecord};
pub use patch::{NotificationPatch, PatchOp};
pub use payload::ActionPayload;
pub use scope::NotificationScope;
