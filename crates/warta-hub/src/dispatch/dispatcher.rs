//! Action entry points.

use std::sync::Arc;

use tracing::{debug, info, warn};

use warta_core::error::ErrorKind;
use warta_core::types::stamp::StatusStamp;
use warta_entity::budget::BudgetDecision;
use warta_entity::decree::DecreeStatus;
use warta_entity::notification::{ActionPayload, NotificationRecord};
use warta_store::NotificationStore;

use crate::lifecycle::LifecycleService;
use crate::metrics::HubMetrics;
use crate::viewer::ViewerContext;

use super::fanout;
use super::gateway::{BudgetGateway, DecreeGateway};
use super::navigator::Navigator;
use super::outcome::{ActionError, ActionResult, ActionStep, ActionTrace};

/// Executes notification action bundles for one viewer.
///
/// Effects are sequenced domain mutation, then cascade, then the read
/// transition on the originating record. The read flag therefore marks a
/// fully completed bundle: a replay on a consumed notification re-attempts
/// nothing, while a retry after a cascade failure (record still unread)
/// re-runs the cascade.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    store: Arc<dyn NotificationStore>,
    budgets: Arc<dyn BudgetGateway>,
    decrees: Arc<dyn DecreeGateway>,
    navigator: Arc<dyn Navigator>,
    lifecycle: LifecycleService,
    metrics: Arc<HubMetrics>,
}

impl ActionDispatcher {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        budgets: Arc<dyn BudgetGateway>,
        decrees: Arc<dyn DecreeGateway>,
        navigator: Arc<dyn Navigator>,
        metrics: Arc<HubMetrics>,
    ) -> Self {
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            store,
            budgets,
            decrees,
            navigator,
            metrics,
        }
    }

    /// Marks the record read, then routes the viewer to its link (if any).
    ///
    /// The read transition comes first so the unread badge clears even
    /// when navigation fails; a navigation failure never rolls it back.
    pub async fn open_notification(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
    ) -> ActionResult {
        let result = self.run_open(viewer, record).await;
        self.finalize("open", viewer, record, result)
    }

    /// Verifies the decree referenced by the record's payload, then
    /// consumes the record.
    pub async fn verify_decree(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
    ) -> ActionResult {
        let result = self.run_verify(viewer, record).await;
        self.finalize("verify_decree", viewer, record, result)
    }

    /// Records a budget decision, fans out cascade notifications, then
    /// consumes the record.
    pub async fn decide_budget(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
        decision: BudgetDecision,
    ) -> ActionResult {
        let action = match decision {
            BudgetDecision::Approve => "approve_budget",
            BudgetDecision::Reject { .. } => "reject_budget",
        };
        let result = self.run_decide(viewer, record, &decision).await;
        self.finalize(action, viewer, record, result)
    }

    async fn run_open(&self, viewer: &ViewerContext, record: &NotificationRecord) -> ActionResult {
        let mut trace = ActionTrace::new();

        match self.lifecycle.acknowledge(viewer, record).await {
            Ok(true) => trace.lifecycle_updated(),
            Ok(false) => {}
            Err(error) => return Err(trace.fail(ActionStep::Lifecycle, error)),
        }

        if let Some(link) = &record.link {
            match self.navigator.open(link).await {
                Ok(()) => trace.navigated(),
                Err(error) => return Err(trace.fail(ActionStep::Navigation, error)),
            }
        }

        Ok(trace.finish())
    }

    async fn run_verify(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
    ) -> ActionResult {
        let Some(ActionPayload::DecreeVerification {
            decree_id,
            decree_number,
        }) = &record.payload
        else {
            return Err(ActionError::precondition(
                "notification carries no decree verification payload",
            ));
        };
        let decree_id = *decree_id;
        let mut trace = ActionTrace::new();

        let status = match self.decrees.status(decree_id).await {
            Ok(status) => status,
            Err(error) if error.kind == ErrorKind::NotFound => {
                return Err(ActionError::precondition(format!(
                    "decree {decree_number} no longer exists"
                )));
            }
            Err(error) => return Err(trace.fail(ActionStep::DomainMutation, error)),
        };

        match status {
            DecreeStatus::Verified => {
                debug!(decree_id = %decree_id, "Decree already verified, mutation skipped");
            }
            DecreeStatus::Draft => {
                return Err(ActionError::precondition(format!(
                    "decree {decree_number} has not been issued"
                )));
            }
            DecreeStatus::Issued => {
                let stamp = StatusStamp::now(viewer.user_id, viewer.username.clone());
                if let Err(error) = self.decrees.mark_verified(decree_id, stamp).await {
                    return Err(trace.fail(ActionStep::DomainMutation, error));
                }
                trace.domain_applied();
            }
        }

        match self.lifecycle.acknowledge(viewer, record).await {
            Ok(true) => trace.lifecycle_updated(),
            Ok(false) => {}
            Err(error) => return Err(trace.fail(ActionStep::Lifecycle, error)),
        }

        Ok(trace.finish())
    }

    async fn run_decide(
        &self,
        viewer: &ViewerContext,
        record: &NotificationRecord,
        decision: &BudgetDecision,
    ) -> ActionResult {
        let Some(ActionPayload::BudgetApproval {
            budget_id,
            budget_name,
            submitted_by,
        }) = &record.payload
        else {
            return Err(ActionError::precondition(
                "notification carries no budget approval payload",
            ));
        };
        let budget_id = *budget_id;
        let submitted_by = *submitted_by;

        if let BudgetDecision::Reject { reason } = decision {
            if reason.trim().is_empty() {
                return Err(ActionError::precondition(
                    "budget rejection requires a reason",
                ));
            }
        }

        let mut trace = ActionTrace::new();

        let status = match self.budgets.status(budget_id).await {
            Ok(status) => status,
            Err(error) if error.kind == ErrorKind::NotFound => {
                return Err(ActionError::precondition(format!(
                    "budget \"{budget_name}\" no longer exists"
                )));
            }
            Err(error) => return Err(trace.fail(ActionStep::DomainMutation, error)),
        };

        let already_decided = status == decision.status();

        if already_decided && record.is_read_by(viewer.user_id) {
            // The decision stands and the originating record was consumed:
            // a fully completed bundle is being replayed.
            debug!(
                budget_id = %budget_id,
                status = %status,
                "Budget decision replayed, nothing to do"
            );
            return Ok(trace.finish());
        }

        if !already_decided {
            if !status.is_decidable() {
                return Err(ActionError::precondition(format!(
                    "budget \"{budget_name}\" is {status}, expected submitted"
                )));
            }
            let stamp = match decision {
                BudgetDecision::Approve => {
                    StatusStamp::now(viewer.user_id, viewer.username.clone())
                }
                BudgetDecision::Reject { reason } => {
                    StatusStamp::now(viewer.user_id, viewer.username.clone())
                        .with_note(reason.clone())
                }
            };
            if let Err(error) = self
                .budgets
                .apply_decision(budget_id, decision.clone(), stamp)
                .await
            {
                return Err(trace.fail(ActionStep::DomainMutation, error));
            }
            trace.domain_applied();
        }

        let drafts =
            fanout::budget_decision_drafts(viewer, budget_id, budget_name, submitted_by, decision);
        let mut created = 0usize;
        for draft in drafts {
            match self.store.create(draft).await {
                Ok(_) => created += 1,
                Err(error) => {
                    trace.cascade_created(created);
                    return Err(trace.fail(ActionStep::Cascade, error));
                }
            }
        }
        trace.cascade_created(created);

        match self.lifecycle.acknowledge(viewer, record).await {
            Ok(true) => trace.lifecycle_updated(),
            Ok(false) => {}
            Err(error) => return Err(trace.fail(ActionStep::Lifecycle, error)),
        }

        Ok(trace.finish())
    }

    fn finalize(
        &self,
        action: &str,
        viewer: &ViewerContext,
        record: &NotificationRecord,
        result: ActionResult,
    ) -> ActionResult {
        self.metrics.action_dispatched();
        match &result {
            Ok(receipt) => {
                self.metrics
                    .cascades_created_count(receipt.cascade_created as u64);
                info!(
                    action,
                    user_id = %viewer.user_id,
                    notification_id = %record.id,
                    domain = receipt.domain_applied,
                    cascades = receipt.cascade_created,
                    "Notification action completed"
                );
            }
            Err(ActionError::Precondition { reason }) => {
                debug!(
                    action,
                    user_id = %viewer.user_id,
                    notification_id = %record.id,
                    reason,
                    "Notification action rejected"
                );
            }
            Err(ActionError::Total { step, source }) => {
                warn!(
                    action,
                    user_id = %viewer.user_id,
                    notification_id = %record.id,
                    step = %step,
                    error = %source,
                    "Notification action failed with nothing committed"
                );
            }
            Err(ActionError::Partial {
                receipt,
                failed_step,
                source,
                ..
            }) => {
                self.metrics.partial_failure();
                self.metrics
                    .cascades_created_count(receipt.cascade_created as u64);
                warn!(
                    action,
                    user_id = %viewer.user_id,
                    notification_id = %record.id,
                    failed_step = %failed_step,
                    cascades = receipt.cascade_created,
                    error = %source,
                    "Notification action partially applied"
                );
            }
        }
        result
    }
}
