//! Navigation collaborator for open-style actions.

use async_trait::async_trait;
use tracing::trace;

use warta_core::result::AppResult;

/// Routes the viewer to a notification's linked screen.
#[async_trait]
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    async fn open(&self, link: &str) -> AppResult<()>;
}

/// Navigator that goes nowhere. Used headless and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

#[async_trait]
impl Navigator for NoopNavigator {
    async fn open(&self, link: &str) -> AppResult<()> {
        trace!(link, "Navigation skipped (noop navigator)");
        Ok(())
    }
}
