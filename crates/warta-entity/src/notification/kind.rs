//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// Kind of a notification, distinguishing its domain semantics.
///
/// The kind determines which dispatcher handlers apply: decree
/// verifications and budget approvals carry an action payload, while
/// generic and asset notices only support acknowledge-and-navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Plain informational notice.
    Generic,
    /// Village asset notifications (registrations, transfers).
    Asset,
    /// A decree (SK) document awaiting verification.
    DecreeVerification,
    /// A submitted budget awaiting an approval decision.
    BudgetApproval,
}

impl NotificationKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Asset => "asset",
            Self::DecreeVerification => "decree_verification",
            Self::BudgetApproval => "budget_approval",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
