/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for kana-perps-adapter tests

use kana_perps_adapter::{ClientConfig, KanaClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn mock_client(server: &MockServer) -> KanaClient {
    KanaClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Successful envelope around a transaction payload
#[allow(dead_code)]
pub fn payload_envelope(function: &str) -> serde_json::Value {
    serde_json::json!({
        "status": true,
        "data": {
            "function": function,
            "typeArguments": ["0x1::aptos_coin::AptosCoin"],
            "functionArguments": ["66", "25000000"]
        }
    })
}

/// Test wallet address
pub const TEST_ADDRESS: &str = "0x6f1e0b7c4a2d3e5f";
