//! Warta notification hub.
//!
//! One [`hub::NotificationHub`] serves the whole process. Opening a session
//! for a viewer wires three parts together:
//!
//! - [`feed`]: merges the viewer's personal query and (for eligible roles)
//!   their role-broadcast query into one consistent feed snapshot,
//!   recomputed from scratch on every store delivery.
//! - [`lifecycle`]: read/saved/hidden transitions, expressed as store
//!   patches that respect the personal-vs-broadcast scope split.
//! - [`dispatch`]: notification actions that couple a domain mutation
//!   with cascade notifications and consumption of the originating record.
//!
//! The hub owns no persistence. Everything goes through the
//! [`warta_store::NotificationStore`] port.

pub mod dispatch;
pub mod feed;
pub mod hub;
pub mod lifecycle;
pub mod metrics;
pub mod viewer;

pub use dispatch::{ActionError, ActionReceipt, ActionStep};
pub use feed::{FeedItem, FeedSnapshot};
pub use hub::{HubSession, NotificationHub};
pub use metrics::HubMetrics;
pub use viewer::ViewerContext;
