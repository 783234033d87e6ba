/*
[INPUT]:  Adapter, wallet and validation failures
[OUTPUT]: One typed, user-facing error per failed submission
[POS]:    Error handling layer - workflow error taxonomy
[UPDATE]: When adding failure sources or changing notification text
*/

use std::fmt;

use kana_perps_adapter::{AmountOutOfRange, KanaError, WalletError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Fallback when a wallet or chain failure carries no text of its own.
pub const GENERIC_FAILURE: &str = "An error occurred";

/// Which boundary a submission failed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local precondition failed; nothing was sent
    Validation,
    /// The trade API could not be reached or answered garbage
    Network,
    /// The trade API answered `status: false`
    RemoteRejected,
    /// The wallet declined or failed to submit
    Signing,
    /// The chain did not confirm the transaction
    Confirmation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::RemoteRejected => "remote_rejected",
            ErrorKind::Signing => "signing",
            ErrorKind::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

/// Local preconditions checked before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Wallet is not connected.")]
    WalletNotConnected,

    #[error("No account is connected.")]
    MissingAccount,

    #[error("Network {network} is not supported by the trade API.")]
    UnsupportedNetwork { network: String },

    #[error("Minimum amount of {minimum} is required.")]
    AmountBelowMinimum { amount: Decimal, minimum: Decimal },

    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("Amount {amount} is too large.")]
    AmountOutOfRange { amount: Decimal },
}

impl From<AmountOutOfRange> for ValidationFailure {
    fn from(error: AmountOutOfRange) -> Self {
        Self::AmountOutOfRange {
            amount: error.value,
        }
    }
}

/// Terminal failure of one submission, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SubmissionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        };
        Self { kind, message }
    }

    pub fn signing(error: WalletError) -> Self {
        Self::new(ErrorKind::Signing, error.to_string())
    }

    pub fn confirmation(error: WalletError) -> Self {
        Self::new(ErrorKind::Confirmation, error.to_string())
    }
}

impl From<ValidationFailure> for SubmissionError {
    fn from(failure: ValidationFailure) -> Self {
        Self::new(ErrorKind::Validation, failure.to_string())
    }
}

impl From<KanaError> for SubmissionError {
    fn from(error: KanaError) -> Self {
        if let KanaError::InvalidRequest(out_of_range) = error {
            return ValidationFailure::from(out_of_range).into();
        }
        let kind = if error.is_remote_rejection() {
            ErrorKind::RemoteRejected
        } else {
            ErrorKind::Network
        };
        Self::new(kind, error.user_message())
    }
}
