//! Viewing-session configuration.

use serde::{Deserialize, Serialize};

/// Settings for per-viewer notification sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum concurrent sessions per viewer (e.g., open browser tabs).
    /// When exceeded, the oldest session is closed.
    #[serde(default = "default_max_per_viewer")]
    pub max_per_viewer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_per_viewer: default_max_per_viewer(),
        }
    }
}

fn default_max_per_viewer() -> usize {
    5
}
