/*
[INPUT]:  User actions (place order, deposit, withdraw) and shared collaborators
[OUTPUT]: One TransactionWorkflow per action, wired to refresh and notifications
[POS]:    Workflow layer - factory for submission workflows
[UPDATE]: When adding user actions or changing which views refresh after them
*/

use std::sync::Arc;

use kana_perps_adapter::OrderParameters;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::dashboard::Dashboard;
use crate::refresh::{RefreshCallback, RefreshScheduler};
use crate::workflow::{
    Collaborators, Notification, Submission, TransactionIntent, TransactionWorkflow,
    WorkflowSettings,
};

/// Starts a fresh workflow for every user action.
///
/// All workflows share one refresh scheduler, so `shutdown` drops every
/// refresh still pending.
#[derive(Clone)]
pub struct TradeDesk {
    collaborators: Collaborators,
    settings: Arc<WorkflowSettings>,
    scheduler: RefreshScheduler,
    order_callbacks: Vec<RefreshCallback>,
    transfer_callbacks: Vec<RefreshCallback>,
    notifications: Option<mpsc::UnboundedSender<Notification>>,
}

impl TradeDesk {
    pub fn new(collaborators: Collaborators, settings: WorkflowSettings) -> Self {
        Self {
            collaborators,
            settings: Arc::new(settings),
            scheduler: RefreshScheduler::new(),
            order_callbacks: Vec::new(),
            transfer_callbacks: Vec::new(),
            notifications: None,
        }
    }

    /// Refresh `dashboard` after every settlement.
    pub fn with_dashboard(self, dashboard: &Arc<Dashboard>) -> Self {
        self.with_refresh(dashboard.order_callbacks(), dashboard.transfer_callbacks())
    }

    pub fn with_refresh(
        mut self,
        order_callbacks: Vec<RefreshCallback>,
        transfer_callbacks: Vec<RefreshCallback>,
    ) -> Self {
        self.order_callbacks = order_callbacks;
        self.transfer_callbacks = transfer_callbacks;
        self
    }

    pub fn with_notifications(mut self, sender: mpsc::UnboundedSender<Notification>) -> Self {
        self.notifications = Some(sender);
        self
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub async fn place_order(&self, params: &OrderParameters) -> Submission {
        self.workflow(self.order_callbacks.clone())
            .submit(&TransactionIntent::Order(params))
            .await
    }

    pub async fn deposit(&self, market_id: u64, usdc: Decimal) -> Submission {
        self.workflow(self.transfer_callbacks.clone())
            .submit(&TransactionIntent::Deposit { market_id, usdc })
            .await
    }

    pub async fn withdraw(&self, market_id: u64, usdc: Decimal) -> Submission {
        self.workflow(self.transfer_callbacks.clone())
            .submit(&TransactionIntent::Withdraw { market_id, usdc })
            .await
    }

    /// Cancel every refresh armed by this desk and its clones.
    pub fn shutdown(&self) {
        self.scheduler.cancel_all();
    }

    fn workflow(&self, callbacks: Vec<RefreshCallback>) -> TransactionWorkflow {
        let workflow = TransactionWorkflow::new(self.collaborators.clone(), self.settings.clone())
            .with_scheduler(self.scheduler.clone())
            .with_refresh(callbacks);
        match &self.notifications {
            Some(sender) => workflow.with_notifications(sender.clone()),
            None => workflow,
        }
    }
}
