//! Cascade notification construction for budget decisions.

use warta_core::types::id::{BudgetId, UserId};
use warta_entity::budget::BudgetDecision;
use warta_entity::notification::{NotificationDraft, NotificationKind};
use warta_entity::user::UserRole;

use crate::viewer::ViewerContext;

/// Builds the notifications a recorded budget decision fans out to:
/// a personal notice to the submitting official and a treasurer-role
/// broadcast. The personal notice is skipped when the actor decided their
/// own submission.
///
/// Cascade records are plain `Generic` notices with a link to the budget
/// screen and no action payload, so they can never trigger a second
/// decision.
pub fn budget_decision_drafts(
    actor: &ViewerContext,
    budget_id: BudgetId,
    budget_name: &str,
    submitted_by: UserId,
    decision: &BudgetDecision,
) -> Vec<NotificationDraft> {
    let link = format!("/budgets/{budget_id}");
    let (title, message) = match decision {
        BudgetDecision::Approve => (
            "Budget approved",
            format!("{} approved budget \"{}\".", actor.username, budget_name),
        ),
        BudgetDecision::Reject { reason } => (
            "Budget rejected",
            format!(
                "{} rejected budget \"{}\": {}",
                actor.username, budget_name, reason
            ),
        ),
    };

    let mut drafts = Vec::with_capacity(2);
    if submitted_by != actor.user_id {
        drafts.push(
            NotificationDraft::personal(
                submitted_by,
                NotificationKind::Generic,
                title,
                message.clone(),
            )
            .with_link(link.clone()),
        );
    }
    drafts.push(
        NotificationDraft::broadcast(UserRole::Treasurer, NotificationKind::Generic, title, message)
            .with_link(link),
    );
    drafts
}
