/*
[INPUT]:  Market base names
[OUTPUT]: Service health and market listings
[POS]:    HTTP layer - public endpoints (no account required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use crate::http::{KanaClient, Result};
use crate::types::{HealthStatus, MarketInfo};
use reqwest::Method;

impl KanaClient {
    /// Check the trade API
    ///
    /// GET /health
    pub async fn health(&self) -> Result<bool> {
        let builder = self.request(Method::GET, "/health")?;
        let status: HealthStatus = self.send_json(builder).await?;
        Ok(status.status)
    }

    /// List every perpetual market
    ///
    /// GET /getPerpetualAssetsInfo/allMarkets
    pub async fn all_markets(&self) -> Result<Vec<MarketInfo>> {
        let builder = self.request(Method::GET, "/getPerpetualAssetsInfo/allMarkets")?;
        self.send_envelope(builder).await
    }

    /// Find a market by base name, e.g. `APT/USDC`
    pub async fn find_market(&self, base_name: &str) -> Result<Option<MarketInfo>> {
        let markets = self.all_markets().await?;
        Ok(markets.into_iter().find(|m| m.base_name == base_name))
    }
}
