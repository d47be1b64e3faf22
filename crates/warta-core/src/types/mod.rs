//! Shared value types: typed identifiers and domain-mutation stamps.

pub mod id;
pub mod stamp;

pub use id::{BudgetId, DecreeId, NotificationId, SessionId, UserId};
pub use stamp::StatusStamp;
