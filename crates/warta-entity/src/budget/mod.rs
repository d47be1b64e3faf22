//! Village budget (APBDes) vocabulary shared by approval workflows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use warta_core::error::AppError;

/// Review state of a submitted budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a reviewer decision may still be recorded.
    pub fn is_decidable(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BudgetStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(AppError::validation(format!(
                "unknown budget status: {other}"
            ))),
        }
    }
}

/// Outcome a reviewer records against a submitted budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum BudgetDecision {
    Approve,
    Reject { reason: String },
}

impl BudgetDecision {
    /// The status the budget transitions to under this decision.
    pub fn status(&self) -> BudgetStatus {
        match self {
            Self::Approve => BudgetStatus::Approved,
            Self::Reject { .. } => BudgetStatus::Rejected,
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, Self::Approve)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
        }
    }
}

impl fmt::Display for BudgetDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
