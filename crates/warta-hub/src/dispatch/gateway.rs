//! Domain gateways mutated by notification actions.
//!
//! The records admin owns budgets and decrees; the hub only reaches them
//! through these seams. Each gateway exposes a status read so the
//! dispatcher can re-check the target's post-state before mutating.

use async_trait::async_trait;

use warta_core::result::AppResult;
use warta_core::types::id::{BudgetId, DecreeId};
use warta_core::types::stamp::StatusStamp;
use warta_entity::budget::{BudgetDecision, BudgetStatus};
use warta_entity::decree::DecreeStatus;

/// Budget review operations.
#[async_trait]
pub trait BudgetGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Current review status. `NotFound` when the budget no longer exists.
    async fn status(&self, budget_id: BudgetId) -> AppResult<BudgetStatus>;

    /// Records a reviewer decision with the acting official's stamp.
    async fn apply_decision(
        &self,
        budget_id: BudgetId,
        decision: BudgetDecision,
        stamp: StatusStamp,
    ) -> AppResult<()>;
}

/// Decree verification operations.
#[async_trait]
pub trait DecreeGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Current publication status. `NotFound` when the decree no longer
    /// exists.
    async fn status(&self, decree_id: DecreeId) -> AppResult<DecreeStatus>;

    /// Marks an issued decree verified with the verifier's stamp.
    async fn mark_verified(&self, decree_id: DecreeId, stamp: StatusStamp) -> AppResult<()>;
}
