/*
[INPUT]:  Mock trade API server and scripted wallets
[OUTPUT]: Shared fixtures for workflow and dashboard tests
[POS]:    Test infrastructure - shared across console test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for kana-perps-console tests

#![allow(dead_code)]

use std::sync::Arc;

use kana_perps_adapter::{ClientConfig, KanaClient, MockWallet};
use kana_perps_console::{Collaborators, TransactionWorkflow, WorkflowSettings};
use wiremock::MockServer;

pub const TEST_ADDRESS: &str = "0x6f1e0b7c4a2d3e5f";
pub const MARKET_ID: u64 = 66;

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn mock_client(server: &MockServer) -> Arc<KanaClient> {
    Arc::new(
        KanaClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init"),
    )
}

/// Client aimed at a port nothing listens on.
pub fn unreachable_client() -> Arc<KanaClient> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    Arc::new(
        KanaClient::with_config_and_base_url(
            ClientConfig::default(),
            &format!("http://127.0.0.1:{port}"),
        )
        .expect("client init"),
    )
}

pub fn testnet_wallet() -> Arc<MockWallet> {
    Arc::new(MockWallet::connected(TEST_ADDRESS, "testnet"))
}

pub fn collaborators(client: Arc<KanaClient>, wallet: Arc<MockWallet>) -> Collaborators {
    Collaborators::new(client, wallet.clone(), wallet)
}

pub fn workflow(client: Arc<KanaClient>, wallet: Arc<MockWallet>) -> TransactionWorkflow {
    TransactionWorkflow::new(
        collaborators(client, wallet),
        Arc::new(WorkflowSettings::default()),
    )
}

pub fn payload_envelope(function: &str) -> serde_json::Value {
    serde_json::json!({
        "status": true,
        "data": {
            "function": function,
            "typeArguments": [],
            "functionArguments": ["66", "100"]
        }
    })
}

pub fn rejection_envelope(message: &str) -> serde_json::Value {
    serde_json::json!({ "status": false, "message": message })
}

pub fn data_envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "status": true, "data": data })
}
