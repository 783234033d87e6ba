/*
[INPUT]:  Error sources (HTTP transport, API envelope, serialization)
[OUTPUT]: Structured error types separating transport failures from rejections
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::AmountOutOfRange;

/// Message shown when neither the service nor the transport says anything useful.
pub const GENERIC_REQUEST_FAILURE: &str = "request failed";

/// Main error type for the Kana trade API adapter
#[derive(Error, Debug)]
pub enum KanaError {
    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response without a readable envelope
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// The service answered `status: false`
    #[error("{message}")]
    RemoteRejected { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Response was readable but not what the endpoint promises
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built from the given values
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] AmountOutOfRange),
}

impl KanaError {
    /// True for every failure to get a usable answer from the service.
    ///
    /// `RemoteRejected` is the only outcome where the service was reached
    /// and declined; invalid requests never leave the process.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            KanaError::Http(_)
                | KanaError::Api { .. }
                | KanaError::Serialization(_)
                | KanaError::InvalidResponse(_)
        )
    }

    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, KanaError::RemoteRejected { .. })
    }

    /// Text suitable for a notification: the service message when there is
    /// one, otherwise the transport's, otherwise [`GENERIC_REQUEST_FAILURE`].
    pub fn user_message(&self) -> String {
        let message = match self {
            KanaError::RemoteRejected { message } => message.clone(),
            KanaError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_REQUEST_FAILURE.to_string()
        } else {
            message
        }
    }

    /// Create an API error from status code, falling back to the canonical reason
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or(GENERIC_REQUEST_FAILURE)
                .to_string()
        } else {
            message
        };
        KanaError::Api {
            code: status.as_u16(),
            message,
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        KanaError::RemoteRejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string()),
        }
    }
}

/// Result type alias for Kana adapter operations
pub type Result<T> = std::result::Result<T, KanaError>;
