/*
[INPUT]:  Wallet address and market id
[OUTPUT]: Account balances, open orders and order history
[POS]:    HTTP layer - per-account read endpoints
[UPDATE]: When adding new account endpoints or changing query parameters
*/

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::http::{KanaClient, KanaError, Result};
use crate::types::{
    APT_DECIMALS, OpenOrder, OpenOrderBook, OrderHistoryEntry, USDC_DECIMALS, from_base_units,
};

impl KanaClient {
    /// USDC available in the trading account, in whole USDC
    ///
    /// GET /getTradingAccountBalance?marketId={market_id}&address={address}
    pub async fn trading_account_balance(&self, market_id: u64, address: &str) -> Result<Decimal> {
        self.balance("/getTradingAccountBalance", market_id, address, USDC_DECIMALS)
            .await
    }

    /// USDC held by the wallet itself, in whole USDC
    ///
    /// GET /getWalletAccountBalance?marketId={market_id}&address={address}
    pub async fn wallet_account_balance(&self, market_id: u64, address: &str) -> Result<Decimal> {
        self.balance("/getWalletAccountBalance", market_id, address, USDC_DECIMALS)
            .await
    }

    /// APT held by the wallet, in whole APT
    ///
    /// GET /getAccountAptBalance?marketId={market_id}&address={address}
    pub async fn account_apt_balance(&self, market_id: u64, address: &str) -> Result<Decimal> {
        self.balance("/getAccountAptBalance", market_id, address, APT_DECIMALS)
            .await
    }

    async fn balance(
        &self,
        endpoint: &str,
        market_id: u64,
        address: &str,
        decimals: u32,
    ) -> Result<Decimal> {
        let market_id = market_id.to_string();
        let builder = self.get_with_query(
            endpoint,
            &[("marketId", market_id.as_str()), ("address", address)],
        )?;
        let raw: serde_json::Value = self.send_envelope(builder).await?;
        Ok(from_base_units(decimal_from_json(&raw)?, decimals))
    }

    /// Resting orders, asks first then bids
    ///
    /// GET /openOrders?address={address}&marketId={market_id}&orderType=open
    pub async fn open_orders(&self, market_id: u64, address: &str) -> Result<Vec<OpenOrder>> {
        let market_id = market_id.to_string();
        let builder = self.get_with_query(
            "/openOrders",
            &[
                ("address", address),
                ("marketId", market_id.as_str()),
                ("orderType", "open"),
            ],
        )?;
        let book: OpenOrderBook = self.send_envelope(builder).await?;
        Ok(book.into_orders())
    }

    /// Every order the account placed on the market
    ///
    /// GET /orderHistory?address={address}&type=all&marketId={market_id}
    pub async fn order_history(
        &self,
        market_id: u64,
        address: &str,
    ) -> Result<Vec<OrderHistoryEntry>> {
        let market_id = market_id.to_string();
        let builder = self.get_with_query(
            "/orderHistory",
            &[
                ("address", address),
                ("type", "all"),
                ("marketId", market_id.as_str()),
            ],
        )?;
        self.send_envelope(builder).await
    }
}

fn decimal_from_json(value: &serde_json::Value) -> Result<Decimal> {
    let text = match value {
        serde_json::Value::String(raw) => raw.trim().to_string(),
        serde_json::Value::Number(number) => number.to_string(),
        other => {
            return Err(KanaError::InvalidResponse(format!(
                "expected numeric balance, got {other}"
            )));
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| KanaError::InvalidResponse(format!("invalid balance {text}: {e}")))
}
