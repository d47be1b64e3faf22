//! Notification persistence port and backends.
//!
//! The [`port::NotificationStore`] trait is the only surface the rest of
//! the system talks to. Subscriptions deliver full snapshots of the
//! matching record set over a watch channel, so consumers always replace
//! their local copy instead of folding diffs.

pub mod memory;
pub mod port;
pub mod query;

pub use memory::MemoryNotificationStore;
pub use port::{NotificationStore, Snapshot};
pub use query::NotificationQuery;
