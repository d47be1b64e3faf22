//! Action outcome taxonomy.

use std::fmt;

use serde::Serialize;

use warta_core::error::AppError;

/// One effect slot in an action pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStep {
    /// Gateway mutation of the budget or decree.
    DomainMutation,
    /// Cascade notification creation.
    Cascade,
    /// Read transition on the originating record.
    Lifecycle,
    /// Routing the viewer to the linked screen.
    Navigation,
}

impl ActionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainMutation => "domain_mutation",
            Self::Cascade => "cascade",
            Self::Lifecycle => "lifecycle",
            Self::Navigation => "navigation",
        }
    }
}

impl fmt::Display for ActionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a completed (or partially completed) action actually did.
///
/// `domain_applied` is `false` on a replay that found the target already
/// in its desired state; skipped work is not reported as done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionReceipt {
    pub domain_applied: bool,
    pub cascade_created: usize,
    pub lifecycle_updated: bool,
    pub navigated: bool,
}

/// How an action failed.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Rejected before any effect was attempted.
    #[error("action precondition failed: {reason}")]
    Precondition { reason: String },

    /// Failed with no effect committed. Retrying repeats the whole action.
    #[error("action failed at {step} with nothing committed: {source}")]
    Total {
        step: ActionStep,
        #[source]
        source: AppError,
    },

    /// Failed after at least one effect committed. The committed effects
    /// stand; the receipt says exactly which.
    #[error("action partially applied, failed at {failed_step}: {source}")]
    Partial {
        committed: Vec<ActionStep>,
        receipt: ActionReceipt,
        failed_step: ActionStep,
        #[source]
        source: AppError,
    },
}

impl ActionError {
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

pub type ActionResult = Result<ActionReceipt, ActionError>;

/// Ordered record of the effects an action has committed so far.
///
/// The first failure ends the pipeline: with nothing committed it reduces
/// to [`ActionError::Total`], otherwise to [`ActionError::Partial`].
#[derive(Debug, Default)]
pub struct ActionTrace {
    committed: Vec<ActionStep>,
    receipt: ActionReceipt,
}

impl ActionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain_applied(&mut self) {
        self.committed.push(ActionStep::DomainMutation);
        self.receipt.domain_applied = true;
    }

    /// Records cascade records created so far. A count of zero commits
    /// nothing.
    pub fn cascade_created(&mut self, count: usize) {
        if count > 0 {
            self.committed.push(ActionStep::Cascade);
            self.receipt.cascade_created = count;
        }
    }

    pub fn lifecycle_updated(&mut self) {
        self.committed.push(ActionStep::Lifecycle);
        self.receipt.lifecycle_updated = true;
    }

    pub fn navigated(&mut self) {
        self.committed.push(ActionStep::Navigation);
        self.receipt.navigated = true;
    }

    pub fn receipt(&self) -> &ActionReceipt {
        &self.receipt
    }

    /// Ends the pipeline at a failed step.
    pub fn fail(self, step: ActionStep, source: AppError) -> ActionError {
        if self.committed.is_empty() {
            ActionError::Total { step, source }
        } else {
            ActionError::Partial {
                committed: self.committed,
                receipt: self.receipt,
                failed_step: step,
                source,
            }
        }
    }

    pub fn finish(self) -> ActionReceipt {
        self.receipt
    }
}
