//! Kind-specific action payloads.

use serde::{Deserialize, Serialize};

use warta_core::types::id::{BudgetId, DecreeId, UserId};

/// Structured data the action dispatcher needs to execute a
/// kind-specific action against an external domain record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionPayload {
    /// Target of a decree verification action.
    DecreeVerification {
        /// The decree document to verify.
        decree_id: DecreeId,
        /// The official decree number (embedded in messages).
        decree_number: String,
    },
    /// Target of a budget approval/rejection action.
    BudgetApproval {
        /// The budget record to decide on.
        budget_id: BudgetId,
        /// Display name of the budget (embedded in cascade messages).
        budget_name: String,
        /// The official who submitted the budget for approval.
        submitted_by: UserId,
    },
}
