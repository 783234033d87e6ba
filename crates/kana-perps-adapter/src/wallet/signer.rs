/*
[INPUT]:  Transaction payloads from the trade API
[OUTPUT]: Submitted transaction hashes and confirmation results
[POS]:    Wallet layer - wallet/chain integration abstraction
[UPDATE]: When adding new wallet types or changing submission flow
*/

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TransactionPayload;

/// Errors reported by the wallet or the chain client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The user declined the signature request
    #[error("user rejected the request")]
    UserRejected,

    /// The wallet could not build, sign or submit the transaction
    #[error("{0}")]
    Wallet(String),

    /// The transaction was submitted but did not confirm
    #[error("{0}")]
    Confirmation(String),

    /// The chain client gave up waiting
    #[error("transaction {hash} was not confirmed in time")]
    Timeout { hash: String },
}

/// Network the wallet is connected to, e.g. `testnet`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NetworkInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_id: None,
            url: None,
        }
    }
}

impl fmt::Display for NetworkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A transaction accepted by the wallet, not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: String,
    pub network: Option<NetworkInfo>,
    pub submitted_at: DateTime<Utc>,
}

/// Connected wallet able to sign and submit entry function payloads.
///
/// The trait is async to support browser extensions, hardware wallets and
/// remote signers.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Connected account address, if any
    fn account(&self) -> Option<String>;

    /// Network the wallet currently points at
    fn network(&self) -> Option<NetworkInfo>;

    /// Sign the payload and hand it to the chain, returning its hash
    async fn sign_and_submit(
        &self,
        payload: &TransactionPayload,
    ) -> Result<PendingTransaction, WalletError>;
}

/// Chain client that blocks until a submitted transaction is final
#[async_trait]
pub trait TransactionConfirmer: Send + Sync {
    async fn wait_for_transaction(
        &self,
        network: Option<&NetworkInfo>,
        hash: &str,
    ) -> Result<(), WalletError>;
}
