//! Shared test helpers for hub integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use warta_core::config::HubConfig;
use warta_core::error::AppError;
use warta_core::result::AppResult;
use warta_core::types::id::{BudgetId, DecreeId, NotificationId, UserId};
use warta_core::types::stamp::StatusStamp;
use warta_entity::budget::{BudgetDecision, BudgetStatus};
use warta_entity::decree::DecreeStatus;
use warta_entity::notification::{
    ActionPayload, NotificationDraft, NotificationKind, NotificationPatch, NotificationRecord,
};
use warta_entity::user::UserRole;
use warta_hub::dispatch::{BudgetGateway, DecreeGateway, Navigator};
use warta_hub::{FeedSnapshot, NotificationHub, ViewerContext};
use warta_store::{MemoryNotificationStore, NotificationQuery, NotificationStore, Snapshot};

/// Fully wired hub over an instrumented in-memory store and stub gateways.
pub struct TestHub {
    pub hub: NotificationHub,
    pub store: Arc<InstrumentedStore>,
    pub budgets: Arc<StubBudgets>,
    pub decrees: Arc<StubDecrees>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestHub {
    pub fn new() -> Self {
        let store = Arc::new(InstrumentedStore::new());
        let budgets = Arc::new(StubBudgets::default());
        let decrees = Arc::new(StubDecrees::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let hub = NotificationHub::new(
            store.clone(),
            budgets.clone(),
            decrees.clone(),
            navigator.clone(),
            HubConfig::default(),
        );
        Self {
            hub,
            store,
            budgets,
            decrees,
            navigator,
        }
    }

    pub async fn open(&self, viewer: ViewerContext) -> Arc<warta_hub::HubSession> {
        self.hub.open_session(viewer).await.expect("open session")
    }

    pub async fn seed_personal(&self, recipient: UserId, title: &str) -> NotificationId {
        self.store
            .create(NotificationDraft::personal(
                recipient,
                NotificationKind::Generic,
                title,
                "message",
            ))
            .await
            .expect("seed personal notification")
    }

    pub async fn seed_broadcast(&self, role: UserRole, title: &str) -> NotificationId {
        self.store
            .create(NotificationDraft::broadcast(
                role,
                NotificationKind::Generic,
                title,
                "message",
            ))
            .await
            .expect("seed broadcast notification")
    }

    /// Seeds a verification request notification and the decree it points
    /// at (status `Issued`).
    pub async fn seed_decree_request(
        &self,
        recipient: UserId,
        decree_number: &str,
    ) -> (NotificationId, DecreeId) {
        let decree_id = DecreeId::new();
        self.decrees.insert(decree_id, DecreeStatus::Issued);
        let notification_id = self
            .store
            .create(
                NotificationDraft::personal(
                    recipient,
                    NotificationKind::DecreeVerification,
                    "Decree awaiting verification",
                    format!("Decree {decree_number} was issued and awaits verification."),
                )
                .with_link(format!("/decrees/{decree_id}"))
                .with_payload(ActionPayload::DecreeVerification {
                    decree_id,
                    decree_number: decree_number.to_string(),
                }),
            )
            .await
            .expect("seed decree notification");
        (notification_id, decree_id)
    }

    /// Seeds an approval request notification and the budget it points at
    /// (status `Submitted`).
    pub async fn seed_budget_request(
        &self,
        recipient: UserId,
        budget_name: &str,
        submitted_by: UserId,
    ) -> (NotificationId, BudgetId) {
        let budget_id = BudgetId::new();
        self.budgets.insert(budget_id, BudgetStatus::Submitted);
        let notification_id = self
            .store
            .create(
                NotificationDraft::personal(
                    recipient,
                    NotificationKind::BudgetApproval,
                    "Budget awaiting review",
                    format!("Budget \"{budget_name}\" was submitted for review."),
                )
                .with_link(format!("/budgets/{budget_id}"))
                .with_payload(ActionPayload::BudgetApproval {
                    budget_id,
                    budget_name: budget_name.to_string(),
                    submitted_by,
                }),
            )
            .await
            .expect("seed budget notification");
        (notification_id, budget_id)
    }
}

pub fn make_viewer(role: UserRole) -> ViewerContext {
    ViewerContext::new(UserId::new(), role, "Bu Rina")
}

pub fn make_named_viewer(role: UserRole, username: &str) -> ViewerContext {
    ViewerContext::new(UserId::new(), role, username)
}

/// Waits until the view satisfies the predicate, consuming intermediate
/// publishes. Panics after five seconds.
pub async fn wait_for_view<F>(
    rx: &mut watch::Receiver<FeedSnapshot>,
    mut predicate: F,
) -> FeedSnapshot
where
    F: FnMut(&FeedSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let view = rx.borrow_and_update();
                if predicate(&view) {
                    return view.clone();
                }
            }
            rx.changed().await.expect("view channel closed");
        }
    })
    .await
    .expect("timed out waiting for view")
}

/// Store wrapper that counts calls and injects failures on demand.
#[derive(Debug, Default)]
pub struct InstrumentedStore {
    inner: MemoryNotificationStore,
    pub write_one_calls: AtomicUsize,
    pub write_batch_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    fail_write_ones: AtomicUsize,
    fail_write_batches: AtomicUsize,
    fail_creates: AtomicUsize,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `write_one` fail with a transient error.
    pub fn fail_next_write_one(&self) {
        self.fail_write_ones.fetch_add(1, Ordering::SeqCst);
    }

    /// Makes the next `write_batch` fail with a transient error.
    pub fn fail_next_write_batch(&self) {
        self.fail_write_batches.fetch_add(1, Ordering::SeqCst);
    }

    /// Makes the next `create` fail with a transient error.
    pub fn fail_next_create(&self) {
        self.fail_creates.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn get(&self, id: NotificationId) -> Option<NotificationRecord> {
        self.inner.get(id).await
    }

    pub async fn all_records(&self) -> Vec<NotificationRecord> {
        self.inner.all_records().await
    }

    pub async fn record_count(&self) -> usize {
        self.inner.len().await
    }

    pub async fn watcher_count(&self) -> usize {
        self.inner.watcher_count().await
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl NotificationStore for InstrumentedStore {
    async fn subscribe(&self, query: NotificationQuery) -> AppResult<watch::Receiver<Snapshot>> {
        self.inner.subscribe(query).await
    }

    async fn write_one(&self, id: NotificationId, patch: NotificationPatch) -> AppResult<()> {
        self.write_one_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.fail_write_ones) {
            return Err(AppError::unavailable("store offline"));
        }
        self.inner.write_one(id, patch).await
    }

    async fn write_batch(
        &self,
        writes: Vec<(NotificationId, NotificationPatch)>,
    ) -> AppResult<()> {
        self.write_batch_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.fail_write_batches) {
            return Err(AppError::unavailable("store offline"));
        }
        self.inner.write_batch(writes).await
    }

    async fn create(&self, draft: NotificationDraft) -> AppResult<NotificationId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.fail_creates) {
            return Err(AppError::unavailable("store offline"));
        }
        self.inner.create(draft).await
    }
}

/// Budget gateway stub with failure injection.
#[derive(Debug, Default)]
pub struct StubBudgets {
    statuses: Mutex<HashMap<BudgetId, BudgetStatus>>,
    decisions: Mutex<Vec<(BudgetId, BudgetDecision, StatusStamp)>>,
    fail_mutations: AtomicUsize,
}

impl StubBudgets {
    pub fn insert(&self, budget_id: BudgetId, status: BudgetStatus) {
        self.statuses.lock().unwrap().insert(budget_id, status);
    }

    pub fn status_of(&self, budget_id: BudgetId) -> Option<BudgetStatus> {
        self.statuses.lock().unwrap().get(&budget_id).copied()
    }

    pub fn decisions(&self) -> Vec<(BudgetId, BudgetDecision, StatusStamp)> {
        self.decisions.lock().unwrap().clone()
    }

    pub fn decision_count(&self) -> usize {
        self.decisions.lock().unwrap().len()
    }

    pub fn fail_next_mutation(&self) {
        self.fail_mutations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BudgetGateway for StubBudgets {
    async fn status(&self, budget_id: BudgetId) -> AppResult<BudgetStatus> {
        self.status_of(budget_id)
            .ok_or_else(|| AppError::not_found(format!("budget {budget_id} not found")))
    }

    async fn apply_decision(
        &self,
        budget_id: BudgetId,
        decision: BudgetDecision,
        stamp: StatusStamp,
    ) -> AppResult<()> {
        if take_one(&self.fail_mutations) {
            return Err(AppError::unavailable("budget service offline"));
        }
        let mut statuses = self.statuses.lock().unwrap();
        let Some(status) = statuses.get_mut(&budget_id) else {
            return Err(AppError::not_found(format!("budget {budget_id} not found")));
        };
        *status = decision.status();
        drop(statuses);
        self.decisions
            .lock()
            .unwrap()
            .push((budget_id, decision, stamp));
        Ok(())
    }
}

/// Decree gateway stub with failure injection.
#[derive(Debug, Default)]
pub struct StubDecrees {
    statuses: Mutex<HashMap<DecreeId, DecreeStatus>>,
    verifications: Mutex<Vec<(DecreeId, StatusStamp)>>,
    fail_mutations: AtomicUsize,
}

impl StubDecrees {
    pub fn insert(&self, decree_id: DecreeId, status: DecreeStatus) {
        self.statuses.lock().unwrap().insert(decree_id, status);
    }

    pub fn status_of(&self, decree_id: DecreeId) -> Option<DecreeStatus> {
        self.statuses.lock().unwrap().get(&decree_id).copied()
    }

    pub fn verifications(&self) -> Vec<(DecreeId, StatusStamp)> {
        self.verifications.lock().unwrap().clone()
    }

    pub fn fail_next_mutation(&self) {
        self.fail_mutations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DecreeGateway for StubDecrees {
    async fn status(&self, decree_id: DecreeId) -> AppResult<DecreeStatus> {
        self.status_of(decree_id)
            .ok_or_else(|| AppError::not_found(format!("decree {decree_id} not found")))
    }

    async fn mark_verified(&self, decree_id: DecreeId, stamp: StatusStamp) -> AppResult<()> {
        if take_one(&self.fail_mutations) {
            return Err(AppError::unavailable("decree service offline"));
        }
        let mut statuses = self.statuses.lock().unwrap();
        let Some(status) = statuses.get_mut(&decree_id) else {
            return Err(AppError::not_found(format!("decree {decree_id} not found")));
        };
        *status = DecreeStatus::Verified;
        drop(statuses);
        self.verifications.lock().unwrap().push((decree_id, stamp));
        Ok(())
    }
}

/// Navigator stub that records every opened link.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
    fail_opens: AtomicUsize,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn fail_next_open(&self) {
        self.fail_opens.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn open(&self, link: &str) -> AppResult<()> {
        if take_one(&self.fail_opens) {
            return Err(AppError::internal("navigation target unavailable"));
        }
        self.opened.lock().unwrap().push(link.to_string());
        Ok(())
    }
}
