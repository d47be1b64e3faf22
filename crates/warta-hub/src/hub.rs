//! Hub facade and per-viewer sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{info, warn};

use warta_core::config::HubConfig;
use warta_core::error::AppError;
use warta_core::result::AppResult;
use warta_core::types::id::{NotificationId, SessionId, UserId};
use warta_entity::budget::BudgetDecision;
use warta_entity::notification::NotificationRecord;
use warta_store::NotificationStore;

use crate::dispatch::{
    ActionDispatcher, ActionError, ActionResult, BudgetGateway, DecreeGateway, Navigator,
};
use crate::feed::{FeedAggregator, FeedSnapshot};
use crate::lifecycle::LifecycleService;
use crate::metrics::HubMetrics;
use crate::viewer::ViewerContext;

/// Service-wide entry point.
///
/// One hub per process; viewers attach through [`open_session`]. The hub
/// enforces a per-viewer session cap by closing the oldest session when a
/// new one would exceed it.
///
/// [`open_session`]: NotificationHub::open_session
#[derive(Debug)]
pub struct NotificationHub {
    store: Arc<dyn NotificationStore>,
    lifecycle: LifecycleService,
    dispatcher: ActionDispatcher,
    config: HubConfig,
    metrics: Arc<HubMetrics>,
    sessions: DashMap<SessionId, Arc<HubSession>>,
}

impl NotificationHub {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        budgets: Arc<dyn BudgetGateway>,
        decrees: Arc<dyn DecreeGateway>,
        navigator: Arc<dyn Navigator>,
        config: HubConfig,
    ) -> Self {
        let metrics = Arc::new(HubMetrics::new());
        let dispatcher =
            ActionDispatcher::new(store.clone(), budgets, decrees, navigator, metrics.clone());
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            dispatcher,
            store,
            config,
            metrics,
            sessions: DashMap::new(),
        }
    }

    /// Opens a session for the viewer: subscribes their queries, computes
    /// the initial feed, and registers the session.
    pub async fn open_session(&self, viewer: ViewerContext) -> AppResult<Arc<HubSession>> {
        self.evict_at_cap(&viewer).await;

        let aggregator =
            FeedAggregator::start(viewer.clone(), self.store.clone(), self.metrics.clone()).await?;
        let session = Arc::new(HubSession {
            id: SessionId::new(),
            viewer,
            opened_at: Utc::now(),
            aggregator,
            lifecycle: self.lifecycle.clone(),
            dispatcher: self.dispatcher.clone(),
        });
        self.sessions.insert(session.id, session.clone());
        self.metrics.session_opened();
        info!(
            session_id = %session.id,
            user_id = %session.viewer.user_id,
            role = %session.viewer.role,
            "Hub session opened"
        );
        Ok(session)
    }

    /// Closes the viewer's oldest session when they are at the cap.
    async fn evict_at_cap(&self, viewer: &ViewerContext) {
        let max = self.config.sessions.max_per_viewer;
        let mine: Vec<Arc<HubSession>> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().viewer.user_id == viewer.user_id)
            .map(|entry| entry.value().clone())
            .collect();
        if mine.len() >= max {
            warn!(
                user_id = %viewer.user_id,
                count = mine.len(),
                max,
                "Viewer at max sessions, oldest will be closed"
            );
            if let Some(oldest) = mine.into_iter().min_by_key(|session| session.opened_at) {
                self.close_session(oldest.id).await;
            }
        }
    }

    /// Closes a session and stops its aggregator. Returns `false` when the
    /// id is unknown.
    pub async fn close_session(&self, id: SessionId) -> bool {
        if let Some((_, session)) = self.sessions.remove(&id) {
            session.aggregator.shutdown().await;
            self.metrics.session_closed();
            info!(
                session_id = %id,
                user_id = %session.viewer.user_id,
                "Hub session closed"
            );
            true
        } else {
            false
        }
    }

    pub fn session(&self, id: SessionId) -> Option<Arc<HubSession>> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn sessions_for(&self, user_id: UserId) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.value().viewer.user_id == user_id)
            .count()
    }

    pub fn metrics(&self) -> Arc<HubMetrics> {
        self.metrics.clone()
    }

    /// Closes every session.
    pub async fn shutdown(&self) {
        let ids: Vec<SessionId> = self.sessions.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            self.close_session(id).await;
        }
        info!("Notification hub shut down");
    }
}

/// One viewer's live attachment to the hub.
///
/// All operations are scoped to the viewer the session was opened for and
/// to the records currently visible in their merged view. Referencing a
/// record that is no longer visible fails without attempting any effect.
#[derive(Debug)]
pub struct HubSession {
    id: SessionId,
    viewer: ViewerContext,
    opened_at: DateTime<Utc>,
    aggregator: FeedAggregator,
    lifecycle: LifecycleService,
    dispatcher: ActionDispatcher,
}

impl HubSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn viewer(&self) -> &ViewerContext {
        &self.viewer
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The current merged view.
    pub fn view(&self) -> FeedSnapshot {
        self.aggregator.current()
    }

    /// Badge count of the current view.
    pub fn unread_count(&self) -> usize {
        self.aggregator.current().unread_count
    }

    /// Observes every published view, starting from the current one.
    pub fn watch_view(&self) -> watch::Receiver<FeedSnapshot> {
        self.aggregator.watch_view()
    }

    /// Marks one visible record read. `Ok(false)` when it already was.
    pub async fn acknowledge(&self, id: NotificationId) -> AppResult<bool> {
        let record = self.visible_record(id)?;
        self.lifecycle.acknowledge(&self.viewer, &record).await
    }

    /// Flips the saved pin on one visible record; returns the new state.
    pub async fn toggle_saved(&self, id: NotificationId) -> AppResult<bool> {
        let record = self.visible_record(id)?;
        self.lifecycle.toggle_saved(&self.viewer, &record).await
    }

    /// Permanently removes one record from this viewer's feed.
    pub async fn hide(&self, id: NotificationId) -> AppResult<bool> {
        let record = self.visible_record(id)?;
        self.lifecycle.hide(&self.viewer, &record).await
    }

    /// Marks every unread record of the current view read in one batch.
    pub async fn mark_all_read(&self) -> AppResult<usize> {
        self.lifecycle.mark_all_read(&self.viewer, &self.view()).await
    }

    /// Read-and-navigate bundle for a tapped notification.
    pub async fn open_notification(&self, id: NotificationId) -> ActionResult {
        let record = self.actionable_record(id)?;
        self.dispatcher.open_notification(&self.viewer, &record).await
    }

    /// Verifies the decree behind a verification notification.
    pub async fn verify_decree(&self, id: NotificationId) -> ActionResult {
        let record = self.actionable_record(id)?;
        self.dispatcher.verify_decree(&self.viewer, &record).await
    }

    /// Approves the budget behind an approval notification.
    pub async fn approve_budget(&self, id: NotificationId) -> ActionResult {
        let record = self.actionable_record(id)?;
        self.dispatcher
            .decide_budget(&self.viewer, &record, BudgetDecision::Approve)
            .await
    }

    /// Rejects the budget behind an approval notification.
    pub async fn reject_budget(
        &self,
        id: NotificationId,
        reason: impl Into<String>,
    ) -> ActionResult {
        let record = self.actionable_record(id)?;
        self.dispatcher
            .decide_budget(
                &self.viewer,
                &record,
                BudgetDecision::Reject {
                    reason: reason.into(),
                },
            )
            .await
    }

    fn visible_record(&self, id: NotificationId) -> AppResult<NotificationRecord> {
        self.aggregator
            .find_visible(id)
            .map(|item| item.record)
            .ok_or_else(|| {
                AppError::not_found(format!("notification {id} is not visible in this session"))
            })
    }

    fn actionable_record(&self, id: NotificationId) -> Result<NotificationRecord, ActionError> {
        self.aggregator
            .find_visible(id)
            .map(|item| item.record)
            .ok_or_else(|| {
                ActionError::precondition(format!(
                    "notification {id} is not visible in this session"
                ))
            })
    }
}
