/*
[INPUT]:  Scripted wallet behavior (connection, failures)
[OUTPUT]: In-memory wallet and chain client for tests and dry runs
[POS]:    Wallet layer - mock implementation
[UPDATE]: When the wallet traits change
*/

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{NetworkInfo, PendingTransaction, TransactionConfirmer, WalletError, WalletSigner};
use crate::types::TransactionPayload;

/// Mock wallet that records every payload it is asked to sign.
///
/// Hashes are derived from random UUIDs; confirmation succeeds unless a
/// failure was scripted.
#[derive(Debug)]
pub struct MockWallet {
    connected: bool,
    account: Option<String>,
    network: Option<NetworkInfo>,
    sign_failure: Option<WalletError>,
    confirm_failure: Option<WalletError>,
    submitted: Mutex<Vec<TransactionPayload>>,
    confirmed: Mutex<Vec<String>>,
}

impl MockWallet {
    /// Connected wallet on `network` with the given account
    pub fn connected(account: &str, network: &str) -> Self {
        Self {
            connected: true,
            account: Some(account.to_string()),
            network: Some(NetworkInfo::named(network)),
            sign_failure: None,
            confirm_failure: None,
            submitted: Mutex::new(Vec::new()),
            confirmed: Mutex::new(Vec::new()),
        }
    }

    /// Wallet that is not connected to anything
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            account: None,
            network: None,
            ..Self::connected("", "")
        }
    }

    pub fn without_account(mut self) -> Self {
        self.account = None;
        self
    }

    pub fn without_network(mut self) -> Self {
        self.network = None;
        self
    }

    pub fn failing_signature(mut self, error: WalletError) -> Self {
        self.sign_failure = Some(error);
        self
    }

    pub fn failing_confirmation(mut self, error: WalletError) -> Self {
        self.confirm_failure = Some(error);
        self
    }

    /// Payloads passed to `sign_and_submit`, in call order
    pub fn submitted(&self) -> Vec<TransactionPayload> {
        self.submitted
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }

    /// Hashes passed to `wait_for_transaction`, in call order
    pub fn confirmed(&self) -> Vec<String> {
        self.confirmed
            .lock()
            .map(|hashes| hashes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl WalletSigner for MockWallet {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn account(&self) -> Option<String> {
        self.account.clone()
    }

    fn network(&self) -> Option<NetworkInfo> {
        self.network.clone()
    }

    async fn sign_and_submit(
        &self,
        payload: &TransactionPayload,
    ) -> Result<PendingTransaction, WalletError> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(payload.clone());
        }

        if let Some(error) = &self.sign_failure {
            return Err(error.clone());
        }

        Ok(PendingTransaction {
            hash: format!("0x{}", Uuid::new_v4().simple()),
            network: self.network.clone(),
            submitted_at: Utc::now(),
        })
    }
}

#[async_trait]
impl TransactionConfirmer for MockWallet {
    async fn wait_for_transaction(
        &self,
        _network: Option<&NetworkInfo>,
        hash: &str,
    ) -> Result<(), WalletError> {
        if let Ok(mut confirmed) = self.confirmed.lock() {
            confirmed.push(hash.to_string());
        }

        match &self.confirm_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> TransactionPayload {
        TransactionPayload {
            function: "0x1::module::function".to_string(),
            type_arguments: vec![],
            function_arguments: vec![serde_json::json!("1")],
        }
    }

    #[tokio::test]
    async fn test_mock_wallet_submits_and_records() {
        let wallet = MockWallet::connected("0xa11ce", "testnet");

        assert!(wallet.is_connected());
        assert_eq!(wallet.account().as_deref(), Some("0xa11ce"));

        let pending = wallet.sign_and_submit(&payload()).await.unwrap();
        assert!(pending.hash.starts_with("0x"));
        assert_eq!(pending.network, Some(NetworkInfo::named("testnet")));

        wallet
            .wait_for_transaction(pending.network.as_ref(), &pending.hash)
            .await
            .unwrap();

        assert_eq!(wallet.submitted(), vec![payload()]);
        assert_eq!(wallet.confirmed(), vec![pending.hash]);
    }

    #[tokio::test]
    async fn test_mock_wallet_scripted_failures() {
        let wallet = MockWallet::connected("0xa11ce", "testnet")
            .failing_signature(WalletError::UserRejected);

        let err = wallet.sign_and_submit(&payload()).await.unwrap_err();
        assert_eq!(err, WalletError::UserRejected);
        assert_eq!(wallet.submitted().len(), 1);

        let wallet = MockWallet::connected("0xa11ce", "testnet")
            .failing_confirmation(WalletError::Confirmation("vm aborted".to_string()));
        let err = wallet.wait_for_transaction(None, "0x1").await.unwrap_err();
        assert_eq!(err.to_string(), "vm aborted");
    }

    #[test]
    fn test_disconnected_wallet() {
        let wallet = MockWallet::disconnected();
        assert!(!wallet.is_connected());
        assert!(wallet.account().is_none());
        assert!(wallet.network().is_none());
    }
}
