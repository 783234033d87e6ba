/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Kana perps adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;
pub mod wallet;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    GENERIC_REQUEST_FAILURE,
    KanaClient,
    KanaError,
    Result,
    TransactionGateway,
    TRADE_API_BASE_URL,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from wallet
pub use wallet::{
    MockWallet,
    NetworkInfo,
    PendingTransaction,
    TransactionConfirmer,
    WalletError,
    WalletSigner,
};
