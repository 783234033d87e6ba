/*
[INPUT]:  A transaction intent, the gateway and wallet collaborators, refresh callbacks
[OUTPUT]: One Submission (settled transaction or typed failure) plus a notification
[POS]:    Workflow layer - validate, build, fetch payload, sign, confirm, refresh
[UPDATE]: When submission stages, validation rules or notifications change
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kana_perps_adapter::{
    ApiRequest, OrderParameters, TransactionConfirmer, TransactionGateway, WalletSigner,
};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{SubmissionError, ValidationFailure};
use crate::refresh::{
    ORDER_REFRESH_DELAY, RefreshCallback, RefreshHandle, RefreshScheduler, TRANSFER_REFRESH_DELAY,
};
use crate::state_machine::{TransactionStateMachine, WorkflowState};

/// Smallest order amount the trade API accepts, in USDC.
pub const MINIMUM_ORDER_AMOUNT: Decimal = Decimal::TEN;

pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://explorer.aptoslabs.com/txn";

/// Network label used when the wallet does not report one.
pub const UNKNOWN_NETWORK: &str = "unknown";

/// Networks the trade API can build transactions for. Mainnet is left out.
pub fn default_sendable_networks() -> Vec<String> {
    ["testnet", "devnet", "local"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// What the user asked to put on chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionIntent<'a> {
    Order(&'a OrderParameters),
    Deposit { market_id: u64, usdc: Decimal },
    Withdraw { market_id: u64, usdc: Decimal },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Order,
    Deposit,
    Withdraw,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::Order => "order",
            IntentKind::Deposit => "deposit",
            IntentKind::Withdraw => "withdraw",
        };
        f.write_str(name)
    }
}

impl TransactionIntent<'_> {
    pub fn kind(&self) -> IntentKind {
        match self {
            TransactionIntent::Order(_) => IntentKind::Order,
            TransactionIntent::Deposit { .. } => IntentKind::Deposit,
            TransactionIntent::Withdraw { .. } => IntentKind::Withdraw,
        }
    }

    /// Amount checks that need no collaborator.
    pub fn validate_amount(&self) -> Result<(), ValidationFailure> {
        match self {
            TransactionIntent::Order(params) if params.amount < MINIMUM_ORDER_AMOUNT => {
                Err(ValidationFailure::AmountBelowMinimum {
                    amount: params.amount,
                    minimum: MINIMUM_ORDER_AMOUNT,
                })
            }
            TransactionIntent::Deposit { usdc, .. } | TransactionIntent::Withdraw { usdc, .. }
                if *usdc <= Decimal::ZERO =>
            {
                Err(ValidationFailure::NonPositiveAmount)
            }
            _ => Ok(()),
        }
    }

    /// Fails only when a transfer amount cannot be expressed in base units.
    pub fn build_request(&self) -> Result<ApiRequest, ValidationFailure> {
        let request = match *self {
            TransactionIntent::Order(params) => ApiRequest::order(params),
            TransactionIntent::Deposit { market_id, usdc } => {
                ApiRequest::deposit(market_id, usdc)?
            }
            TransactionIntent::Withdraw { market_id, usdc } => {
                ApiRequest::withdraw(market_id, usdc)?
            }
        };
        Ok(request)
    }
}

/// Knobs shared by every workflow instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub sendable_networks: Vec<String>,
    pub explorer_base_url: String,
    pub order_refresh_delay: Duration,
    pub transfer_refresh_delay: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            sendable_networks: default_sendable_networks(),
            explorer_base_url: DEFAULT_EXPLORER_BASE_URL.to_string(),
            order_refresh_delay: ORDER_REFRESH_DELAY,
            transfer_refresh_delay: TRANSFER_REFRESH_DELAY,
        }
    }
}

impl WorkflowSettings {
    pub fn is_sendable(&self, network: &str) -> bool {
        self.sendable_networks
            .iter()
            .any(|name| name.eq_ignore_ascii_case(network))
    }

    pub fn refresh_delay(&self, kind: IntentKind) -> Duration {
        match kind {
            IntentKind::Order => self.order_refresh_delay,
            IntentKind::Deposit | IntentKind::Withdraw => self.transfer_refresh_delay,
        }
    }

    /// `{base}/{hash}?network={name}`
    pub fn explorer_url(&self, hash: &str, network: &str) -> String {
        format!(
            "{}/{}?network={}",
            self.explorer_base_url.trim_end_matches('/'),
            hash,
            network
        )
    }
}

/// A transaction the chain confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledTransaction {
    pub hash: String,
    pub network: String,
    pub explorer_url: String,
    pub submitted_at: DateTime<Utc>,
}

/// Exactly one per submission, sent to the optional notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Settled {
        workflow_id: Uuid,
        kind: IntentKind,
        transaction: SettledTransaction,
    },
    Failed {
        workflow_id: Uuid,
        kind: IntentKind,
        error: SubmissionError,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Settled {
                kind, transaction, ..
            } => write!(
                f,
                "{kind} settled on {}: {}",
                transaction.network, transaction.explorer_url
            ),
            Notification::Failed { kind, error, .. } => {
                write!(f, "{kind} failed ({}): {}", error.kind, error.message)
            }
        }
    }
}

/// Remote services a workflow talks to, shared between instances.
#[derive(Clone)]
pub struct Collaborators {
    pub gateway: Arc<dyn TransactionGateway>,
    pub wallet: Arc<dyn WalletSigner>,
    pub confirmer: Arc<dyn TransactionConfirmer>,
}

impl Collaborators {
    pub fn new(
        gateway: Arc<dyn TransactionGateway>,
        wallet: Arc<dyn WalletSigner>,
        confirmer: Arc<dyn TransactionConfirmer>,
    ) -> Self {
        Self {
            gateway,
            wallet,
            confirmer,
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("wallet_connected", &self.wallet.is_connected())
            .finish_non_exhaustive()
    }
}

/// Result of one `submit` call.
#[derive(Debug)]
pub struct Submission {
    pub id: Uuid,
    pub outcome: Result<SettledTransaction, SubmissionError>,
    /// Every state visited, `Idle` first
    pub states: Vec<WorkflowState>,
    /// Pending refreshes; only present once settled
    pub refresh: Option<RefreshHandle>,
}

impl Submission {
    pub fn is_settled(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn final_state(&self) -> WorkflowState {
        self.states.last().copied().unwrap_or(WorkflowState::Idle)
    }
}

/// One user action, from validation to refresh. Consumed by `submit`.
pub struct TransactionWorkflow {
    id: Uuid,
    machine: TransactionStateMachine,
    collaborators: Collaborators,
    settings: Arc<WorkflowSettings>,
    scheduler: RefreshScheduler,
    callbacks: Vec<RefreshCallback>,
    notifications: Option<mpsc::UnboundedSender<Notification>>,
}

impl TransactionWorkflow {
    pub fn new(collaborators: Collaborators, settings: Arc<WorkflowSettings>) -> Self {
        Self {
            id: Uuid::new_v4(),
            machine: TransactionStateMachine::new(),
            collaborators,
            settings,
            scheduler: RefreshScheduler::new(),
            callbacks: Vec::new(),
            notifications: None,
        }
    }

    /// Arm refreshes from `scheduler` so they share its cancellation scope.
    pub fn with_scheduler(mut self, scheduler: RefreshScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_refresh(mut self, callbacks: Vec<RefreshCallback>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_notifications(mut self, sender: mpsc::UnboundedSender<Notification>) -> Self {
        self.notifications = Some(sender);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> WorkflowState {
        self.machine.state()
    }

    /// Run the intent to a terminal state.
    ///
    /// Never retries. Every failure ends in `Failed` with one notification;
    /// refresh callbacks are armed only after confirmation.
    pub async fn submit(mut self, intent: &TransactionIntent<'_>) -> Submission {
        let kind = intent.kind();
        info!(workflow_id = %self.id, intent = %kind, "submission started");

        let outcome = self.run(intent).await;

        let refresh = match &outcome {
            Ok(settled) => {
                info!(
                    workflow_id = %self.id,
                    hash = %settled.hash,
                    network = %settled.network,
                    "transaction settled"
                );
                let delay = self.settings.refresh_delay(kind);
                Some(self.scheduler.arm(&self.callbacks, delay))
            }
            Err(err) => {
                warn!(
                    workflow_id = %self.id,
                    kind = %err.kind,
                    state = %self.machine.state(),
                    error = %err,
                    "submission failed"
                );
                self.advance(WorkflowState::Failed);
                None
            }
        };

        let notification = match &outcome {
            Ok(transaction) => Notification::Settled {
                workflow_id: self.id,
                kind,
                transaction: transaction.clone(),
            },
            Err(error) => Notification::Failed {
                workflow_id: self.id,
                kind,
                error: error.clone(),
            },
        };
        self.notify(notification);

        Submission {
            id: self.id,
            outcome,
            states: self.machine.history().to_vec(),
            refresh,
        }
    }

    async fn run(
        &mut self,
        intent: &TransactionIntent<'_>,
    ) -> Result<SettledTransaction, SubmissionError> {
        self.advance(WorkflowState::Validating);
        self.validate(intent)?;

        self.advance(WorkflowState::BuildingRequest);
        let request = intent.build_request()?;
        debug!(
            workflow_id = %self.id,
            endpoint = %request.endpoint,
            query = %request.query_string(),
            "request built"
        );

        self.advance(WorkflowState::AwaitingGatewayResponse);
        let payload = self
            .collaborators
            .gateway
            .submit_order_request(&request)
            .await?;

        self.advance(WorkflowState::AwaitingSignature);
        let pending = self
            .collaborators
            .wallet
            .sign_and_submit(&payload)
            .await
            .map_err(SubmissionError::signing)?;
        info!(workflow_id = %self.id, hash = %pending.hash, "transaction submitted");

        self.advance(WorkflowState::AwaitingConfirmation);
        self.collaborators
            .confirmer
            .wait_for_transaction(pending.network.as_ref(), &pending.hash)
            .await
            .map_err(SubmissionError::confirmation)?;

        self.advance(WorkflowState::Settled);

        let network = pending
            .network
            .or_else(|| self.collaborators.wallet.network())
            .map(|network| network.name)
            .unwrap_or_else(|| UNKNOWN_NETWORK.to_string());
        let explorer_url = self.settings.explorer_url(&pending.hash, &network);

        Ok(SettledTransaction {
            hash: pending.hash,
            network,
            explorer_url,
            submitted_at: pending.submitted_at,
        })
    }

    fn validate(&self, intent: &TransactionIntent<'_>) -> Result<(), ValidationFailure> {
        let wallet = &self.collaborators.wallet;
        if !wallet.is_connected() {
            return Err(ValidationFailure::WalletNotConnected);
        }
        if wallet.account().is_none_or(|account| account.is_empty()) {
            return Err(ValidationFailure::MissingAccount);
        }

        let network = wallet
            .network()
            .map(|network| network.name)
            .unwrap_or_else(|| UNKNOWN_NETWORK.to_string());
        if !self.settings.is_sendable(&network) {
            return Err(ValidationFailure::UnsupportedNetwork { network });
        }

        intent.validate_amount()
    }

    fn advance(&mut self, to: WorkflowState) {
        if let Err(err) = self.machine.transition(to) {
            error!(workflow_id = %self.id, error = %err, "illegal workflow transition");
        }
    }

    fn notify(&self, notification: Notification) {
        let Some(sender) = &self.notifications else {
            return;
        };
        if sender.send(notification).is_err() {
            debug!(workflow_id = %self.id, "notification receiver dropped");
        }
    }
}
