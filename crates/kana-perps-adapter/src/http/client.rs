/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client and envelope decoding for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::http::{KanaError, Result};
use crate::types::ApiEnvelope;

/// Base URL of the Kana Labs perpetuals trade API
pub const TRADE_API_BASE_URL: &str = "https://perps-tradeapi.kanalabs.io";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the Kana perpetuals trade API
#[derive(Debug, Clone)]
pub struct KanaClient {
    http_client: Client,
    base_url: Url,
}

impl KanaClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, TRADE_API_BASE_URL)
    }

    /// Create a client against another deployment (or a mock server)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url.trim_end_matches('/'))?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint, keeping any path prefix of the base URL
    fn url(&self, endpoint: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{endpoint}"))?)
    }

    /// Build request builder for an endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// GET with query pairs in the given order
    pub(crate) fn get_with_query<K, V>(
        &self,
        endpoint: &str,
        query: &[(K, V)],
    ) -> Result<RequestBuilder>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.url(endpoint)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        Ok(self.http_client.get(url))
    }

    /// Send a request and decode a plain JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(KanaError::api_error(status, ""));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request and unwrap the `{status, data | message}` envelope
    ///
    /// A readable envelope with `status: false` is a rejection even when the
    /// HTTP status is an error; anything unreadable on a non-2xx response is a
    /// transport failure.
    pub(crate) async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;

        let envelope: ApiEnvelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => {
                warn!(endpoint = %url, error = %err, "undecodable response body");
                return Err(KanaError::Serialization(err));
            }
            Err(_) => {
                warn!(endpoint = %url, status = status.as_u16(), "request failed without envelope");
                return Err(KanaError::api_error(status, ""));
            }
        };

        if !envelope.status {
            warn!(
                endpoint = %url,
                reason = envelope.message.as_deref().unwrap_or_default(),
                "request rejected by service"
            );
            return Err(KanaError::rejected(envelope.message));
        }

        if !status.is_success() {
            return Err(KanaError::api_error(
                status,
                envelope.message.unwrap_or_default(),
            ));
        }

        debug!(endpoint = %url, "envelope accepted");
        let data = envelope.data.ok_or_else(|| {
            KanaError::InvalidResponse(format!("{url}: status true without data"))
        })?;
        Ok(serde_json::from_value(data)?)
    }
}
