/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod account;
pub mod client;
pub mod error;
pub mod public;
pub mod trade;

pub use error::{GENERIC_REQUEST_FAILURE, KanaError, Result};
pub use trade::TransactionGateway;

pub use client::{ClientConfig, KanaClient, TRADE_API_BASE_URL};
