/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use common::{TEST_ADDRESS, mock_client, payload_envelope, setup_mock_server};
use kana_perps_adapter::{
    ApiRequest, ClientConfig, Endpoint, KanaClient, KanaError, OrderParameters, OrderType,
    TransactionGateway,
};
use rust_decimal_macros::dec;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let _client = assert_ok!(KanaClient::new());
}

#[test]
fn test_client_with_config() {
    let config = ClientConfig::default();
    let _client = assert_ok!(KanaClient::with_config(config));
}

#[tokio::test]
async fn test_deposit_payload_roundtrip() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/deposit"))
        .and(query_param("marketId", "66"))
        .and(query_param("amount", "25000000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload_envelope("0xkana::perpetual_scripts::deposit")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let payload = assert_ok!(client.deposit(66, dec!(25)).await);

    assert_eq!(payload.function, "0xkana::perpetual_scripts::deposit");
    assert_eq!(payload.type_arguments, vec!["0x1::aptos_coin::AptosCoin"]);
    assert_eq!(
        payload.function_arguments,
        vec![serde_json::json!("66"), serde_json::json!("25000000")]
    );
}

#[tokio::test]
async fn test_limit_order_without_triggers_sends_no_trigger_keys() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/limitOrder"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload_envelope("0xkana::perpetual_scripts::limit")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = OrderParameters {
        order_type: OrderType::Limit,
        price: dec!(7.25),
        amount: dec!(40),
        size: dec!(40),
        ..OrderParameters::new(66)
    };
    let client = mock_client(&server);
    assert_ok!(client.place_order(&params).await);

    let requests = server.received_requests().await.expect("recording enabled");
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("price=7.25"));
    assert!(!query.contains("takeProfit"));
    assert!(!query.contains("stopLoss"));
}

#[tokio::test]
async fn test_gateway_trait_object() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/withdraw"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload_envelope("0xkana::perpetual_scripts::withdraw")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway: Box<dyn TransactionGateway> = Box::new(mock_client(&server));
    let request = ApiRequest::withdraw(66, dec!(3)).expect("withdraw");
    assert_eq!(request.endpoint, Endpoint::Withdraw);

    let payload = assert_ok!(gateway.submit_order_request(&request).await);
    assert_eq!(payload.function, "0xkana::perpetual_scripts::withdraw");
}

#[tokio::test]
async fn test_envelope_without_data_is_invalid() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/marketOrder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": true
        })))
        .mount(&server)
        .await;

    let err = mock_client(&server)
        .place_order(&OrderParameters::new(66))
        .await
        .expect_err("should fail");
    assert!(matches!(err, KanaError::InvalidResponse(_)));
    assert!(err.is_transport_failure());
}

#[tokio::test]
async fn test_account_endpoints_share_address() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/getWalletAccountBalance"))
        .and(query_param("address", TEST_ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": true,
            "data": 1000000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let balance = assert_ok!(
        mock_client(&server)
            .wallet_account_balance(66, TEST_ADDRESS)
            .await
    );
    assert_eq!(balance, dec!(1));
}
