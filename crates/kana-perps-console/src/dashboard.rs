/*
[INPUT]:  Trade API reads for one account and market
[OUTPUT]: Balances, order history and open orders published on watch channels
[POS]:    State layer - account view refreshed after settlements
[UPDATE]: When adding account views or changing read error handling
*/

use std::sync::Arc;

use kana_perps_adapter::{
    AccountBalances, KanaClient, KanaError, OpenOrder, OrderHistoryEntry, Result,
};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::refresh::RefreshCallback;

/// Account view for one address on one market.
///
/// Every refresh replaces a whole channel value, so readers never observe a
/// half-updated view.
#[derive(Debug)]
pub struct Dashboard {
    client: Arc<KanaClient>,
    market_id: u64,
    address: String,
    balances: watch::Sender<AccountBalances>,
    history: watch::Sender<Vec<OrderHistoryEntry>>,
    open_orders: watch::Sender<Vec<OpenOrder>>,
    last_error: watch::Sender<Option<String>>,
}

impl Dashboard {
    pub fn new(client: Arc<KanaClient>, market_id: u64, address: impl Into<String>) -> Self {
        Self {
            client,
            market_id,
            address: address.into(),
            balances: watch::Sender::new(AccountBalances::default()),
            history: watch::Sender::new(Vec::new()),
            open_orders: watch::Sender::new(Vec::new()),
            last_error: watch::Sender::new(None),
        }
    }

    pub fn market_id(&self) -> u64 {
        self.market_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn balances(&self) -> AccountBalances {
        *self.balances.borrow()
    }

    pub fn order_history(&self) -> Vec<OrderHistoryEntry> {
        self.history.borrow().clone()
    }

    pub fn open_orders(&self) -> Vec<OpenOrder> {
        self.open_orders.borrow().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    pub fn subscribe_balances(&self) -> watch::Receiver<AccountBalances> {
        self.balances.subscribe()
    }

    pub fn subscribe_history(&self) -> watch::Receiver<Vec<OrderHistoryEntry>> {
        self.history.subscribe()
    }

    pub fn subscribe_open_orders(&self) -> watch::Receiver<Vec<OpenOrder>> {
        self.open_orders.subscribe()
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.last_error.subscribe()
    }

    /// Re-read all three balances.
    ///
    /// A balance the service rejects is shown as zero. A transport failure
    /// leaves the previous balances in place.
    pub async fn refresh_balances(&self) -> Result<AccountBalances> {
        let (trading, wallet, apt) = tokio::join!(
            self.client
                .trading_account_balance(self.market_id, &self.address),
            self.client
                .wallet_account_balance(self.market_id, &self.address),
            self.client.account_apt_balance(self.market_id, &self.address),
        );

        let balances = AccountBalances {
            trading_usdc: self.zero_if_rejected("trading_usdc", trading)?,
            wallet_usdc: self.zero_if_rejected("wallet_usdc", wallet)?,
            apt: self.zero_if_rejected("apt", apt)?,
        };

        debug!(
            address = %self.address,
            trading_usdc = %balances.trading_usdc,
            wallet_usdc = %balances.wallet_usdc,
            apt = %balances.apt,
            "balances refreshed"
        );
        self.balances.send_replace(balances);
        self.last_error.send_replace(None);
        Ok(balances)
    }

    pub async fn refresh_order_history(&self) -> Result<usize> {
        let entries = self
            .client
            .order_history(self.market_id, &self.address)
            .await
            .inspect_err(|err| self.record_error("order_history", err))?;
        let count = entries.len();
        self.history.send_replace(entries);
        Ok(count)
    }

    pub async fn refresh_open_orders(&self) -> Result<usize> {
        let orders = self
            .client
            .open_orders(self.market_id, &self.address)
            .await
            .inspect_err(|err| self.record_error("open_orders", err))?;
        let count = orders.len();
        self.open_orders.send_replace(orders);
        Ok(count)
    }

    pub async fn refresh_all(&self) -> Result<()> {
        self.refresh_balances().await?;
        self.refresh_order_history().await?;
        self.refresh_open_orders().await?;
        Ok(())
    }

    /// Re-reads balances when fired. Must run inside a tokio runtime.
    pub fn balances_callback(self: &Arc<Self>) -> RefreshCallback {
        let dashboard = Arc::clone(self);
        Arc::new(move || {
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move {
                let _ = dashboard.refresh_balances().await;
            });
        })
    }

    /// Re-reads order history and open orders when fired.
    pub fn history_callback(self: &Arc<Self>) -> RefreshCallback {
        let dashboard = Arc::clone(self);
        Arc::new(move || {
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move {
                if dashboard.refresh_order_history().await.is_ok() {
                    let _ = dashboard.refresh_open_orders().await;
                }
            });
        })
    }

    /// Callbacks to arm after an order settles
    pub fn order_callbacks(self: &Arc<Self>) -> Vec<RefreshCallback> {
        vec![self.balances_callback(), self.history_callback()]
    }

    /// Callbacks to arm after a deposit or withdraw settles
    pub fn transfer_callbacks(self: &Arc<Self>) -> Vec<RefreshCallback> {
        vec![self.balances_callback()]
    }

    fn zero_if_rejected(&self, balance: &'static str, read: Result<Decimal>) -> Result<Decimal> {
        match read {
            Ok(value) => Ok(value),
            Err(KanaError::RemoteRejected { message }) => {
                warn!(balance, reason = %message, "balance read rejected; showing zero");
                Ok(Decimal::ZERO)
            }
            Err(err) => {
                self.record_error(balance, &err);
                Err(err)
            }
        }
    }

    fn record_error(&self, view: &'static str, err: &KanaError) {
        warn!(view, error = %err, "dashboard refresh failed");
        self.last_error.send_replace(Some(err.user_message()));
    }
}
