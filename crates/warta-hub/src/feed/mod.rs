//! Per-viewer feed assembly.

mod aggregator;
mod merge;
mod view;

pub use aggregator::FeedAggregator;
pub use merge::merge_feed;
pub use view::{FeedItem, FeedSnapshot};
