//! Per-viewer read/saved/hidden lifecycle.

mod service;
mod state;

pub use service::LifecycleService;
pub use state::{
    ViewerState, acknowledge_patch, hide_patch, mark_all_read_patches, save_toggle_patch,
    viewer_state,
};
