/*
[INPUT]:  Order and transfer request descriptors
[OUTPUT]: Transaction payloads ready for wallet signing
[POS]:    HTTP layer - trading endpoints (order placement, deposit, withdraw)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::http::{KanaClient, Result};
use crate::types::{ApiRequest, OrderParameters, TransactionPayload};

/// Anything that turns a request descriptor into a transaction payload.
///
/// Order placement is not idempotent on the remote side: callers must not
/// retry a failed call on their own.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    async fn submit_order_request(&self, request: &ApiRequest) -> Result<TransactionPayload>;
}

#[async_trait]
impl TransactionGateway for KanaClient {
    /// GET {endpoint}?{query}, one attempt
    async fn submit_order_request(&self, request: &ApiRequest) -> Result<TransactionPayload> {
        info!(
            endpoint = %request.endpoint,
            query = %request.query_string(),
            "requesting transaction payload"
        );
        let builder = self.get_with_query(request.endpoint.path(), request.query.as_slice())?;
        self.send_envelope(builder).await
    }
}

impl KanaClient {
    /// Payload for a market or limit order
    ///
    /// GET /marketOrder or GET /limitOrder
    pub async fn place_order(&self, params: &OrderParameters) -> Result<TransactionPayload> {
        self.submit_order_request(&ApiRequest::order(params)).await
    }

    /// Payload moving `usdc` into the trading account
    ///
    /// GET /deposit?marketId={market_id}&amount={micro_usdc}
    pub async fn deposit(&self, market_id: u64, usdc: Decimal) -> Result<TransactionPayload> {
        self.submit_order_request(&ApiRequest::deposit(market_id, usdc)?)
            .await
    }

    /// Payload moving `usdc` back to the wallet
    ///
    /// GET /withdraw?marketId={market_id}&amount={micro_usdc}
    pub async fn withdraw(&self, market_id: u64, usdc: Decimal) -> Result<TransactionPayload> {
        self.submit_order_request(&ApiRequest::withdraw(market_id, usdc)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, KanaClient, KanaError, TransactionGateway};
    use crate::types::{ApiRequest, OrderParameters, OrderType};
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> KanaClient {
        KanaClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    fn payload_body() -> serde_json::Value {
        serde_json::json!({
            "status": true,
            "data": {
                "function": "0xkana::perpetual_scripts::place_order",
                "typeArguments": [],
                "functionArguments": ["66", true, false, "100", 20]
            }
        })
    }

    #[tokio::test]
    async fn test_market_order_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketOrder"))
            .and(query_param("marketId", "66"))
            .and(query_param("size", "100"))
            .and(query_param("leverage", "20"))
            .and(query_param("amount", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload_body()))
            .expect(1)
            .mount(&server)
            .await;

        let params = OrderParameters {
            usdc_deposit: dec!(5),
            amount: dec!(100),
            size: dec!(100),
            ..OrderParameters::new(66)
        };

        let payload = client(&server).place_order(&params).await.expect("payload");
        assert_eq!(payload.function, "0xkana::perpetual_scripts::place_order");
        assert_eq!(payload.function_arguments.len(), 5);
    }

    #[tokio::test]
    async fn test_limit_order_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/limitOrder"))
            .and(query_param("price", "7.25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload_body()))
            .expect(1)
            .mount(&server)
            .await;

        let params = OrderParameters {
            order_type: OrderType::Limit,
            price: dec!(7.25),
            amount: dec!(50),
            size: dec!(50),
            ..OrderParameters::new(66)
        };

        assert!(client(&server).place_order(&params).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejection_carries_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketOrder"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": false,
                "message": "insufficient margin"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .place_order(&OrderParameters::new(66))
            .await
            .expect_err("should reject");
        assert!(matches!(err, KanaError::RemoteRejected { ref message } if message == "insufficient margin"));
    }

    #[tokio::test]
    async fn test_rejection_on_error_status_with_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deposit"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": false,
                "message": "amount too small"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .deposit(66, dec!(1))
            .await
            .expect_err("should reject");
        assert_eq!(err.user_message(), "amount too small");
        assert!(err.is_remote_rejection());
    }

    #[tokio::test]
    async fn test_error_status_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/withdraw"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .withdraw(66, dec!(1))
            .await
            .expect_err("should fail");
        assert!(err.is_transport_failure());
        assert!(matches!(err, KanaError::Api { code: 500, .. }));
    }

    /// Base URL of a local port nothing listens on
    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let client = KanaClient::with_config_and_base_url(ClientConfig::default(), &closed_port_url())
            .expect("client init");
        let request = ApiRequest::deposit(66, dec!(1)).expect("deposit");

        let err = client
            .submit_order_request(&request)
            .await
            .expect_err("should fail");
        assert!(matches!(err, KanaError::Http(_)));
        assert!(err.is_transport_failure());
    }

    #[tokio::test]
    async fn test_oversized_deposit_is_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .deposit(66, rust_decimal::Decimal::MAX)
            .await
            .expect_err("should fail");
        assert!(matches!(err, KanaError::InvalidRequest(_)));
        assert!(!err.is_transport_failure());
    }
}
