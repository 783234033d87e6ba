/*
[INPUT]:  Order parameters collected by the console
[OUTPUT]: Normalized GET request descriptors for the trade API
[POS]:    Data layer - order request builder
[UPDATE]: When order endpoints or query parameters change
*/

use std::fmt;

use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::{Direction, OrderType, TradeSide};
use super::models::{USDC_DECIMALS, to_base_units};

/// Leverage accepted by the perpetual markets, 1x to 20x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Leverage(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("leverage must be between {min} and {max}, got {value}", min = Leverage::MIN, max = Leverage::MAX)]
pub struct LeverageOutOfRange {
    pub value: u8,
}

/// Transfer amount too large to express in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount {value} is out of range")]
pub struct AmountOutOfRange {
    pub value: Decimal,
}

impl Leverage {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;

    pub fn new(value: u8) -> Result<Self, LeverageOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LeverageOutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl Default for Leverage {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Leverage {
    type Error = LeverageOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Leverage> for u8 {
    fn from(value: Leverage) -> Self {
        value.0
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Everything the user entered for one order.
///
/// `take_profit` and `stop_loss` are only sent when `Some`; `Some(0)` is a
/// real trigger price and is sent as `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParameters {
    pub market_id: u64,
    pub trade_side: TradeSide,
    pub direction: Direction,
    pub leverage: Leverage,
    pub usdc_deposit: Decimal,
    pub amount: Decimal,
    pub size: Decimal,
    pub order_type: OrderType,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
}

impl OrderParameters {
    /// Fresh parameters for a market: long, opening, 20x, nothing deposited.
    pub fn new(market_id: u64) -> Self {
        Self {
            market_id,
            trade_side: TradeSide::default(),
            direction: Direction::default(),
            leverage: Leverage::default(),
            usdc_deposit: Decimal::ZERO,
            amount: Decimal::ZERO,
            size: Decimal::ZERO,
            order_type: OrderType::default(),
            price: Decimal::ZERO,
            take_profit: None,
            stop_loss: None,
        }
    }
}

/// Trade API endpoints that answer with a transaction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    MarketOrder,
    LimitOrder,
    Deposit,
    Withdraw,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::MarketOrder => "/marketOrder",
            Endpoint::LimitOrder => "/limitOrder",
            Endpoint::Deposit => "/deposit",
            Endpoint::Withdraw => "/withdraw",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A fully resolved request: method, endpoint and ordered query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    fn get(endpoint: Endpoint) -> Self {
        Self {
            method: Method::GET,
            endpoint,
            query: Vec::new(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Build the market or limit order request for `params`.
    ///
    /// Market orders never carry price or risk triggers. Limit orders add
    /// `price`, and `takeProfit`/`stopLoss` only when they are set.
    pub fn order(params: &OrderParameters) -> Self {
        let endpoint = match params.order_type {
            OrderType::Market => Endpoint::MarketOrder,
            OrderType::Limit => Endpoint::LimitOrder,
        };

        let mut request = Self::get(endpoint)
            .with("marketId", params.market_id.to_string())
            .with("tradeSide", params.trade_side.as_query_value())
            .with("direction", params.direction.as_query_value())
            .with("size", decimal_query_value(params.size))
            .with("leverage", params.leverage.get().to_string());

        if params.order_type == OrderType::Limit {
            request = request.with("price", decimal_query_value(params.price));
        }

        request = request.with("amount", decimal_query_value(params.amount));

        if params.order_type == OrderType::Limit {
            if let Some(take_profit) = params.take_profit {
                request = request.with("takeProfit", decimal_query_value(take_profit));
            }
            if let Some(stop_loss) = params.stop_loss {
                request = request.with("stopLoss", decimal_query_value(stop_loss));
            }
        }

        request
    }

    /// Move `usdc` whole USDC from the wallet into the trading account.
    pub fn deposit(market_id: u64, usdc: Decimal) -> Result<Self, AmountOutOfRange> {
        Self::transfer(Endpoint::Deposit, market_id, usdc)
    }

    /// Move `usdc` whole USDC from the trading account back to the wallet.
    pub fn withdraw(market_id: u64, usdc: Decimal) -> Result<Self, AmountOutOfRange> {
        Self::transfer(Endpoint::Withdraw, market_id, usdc)
    }

    fn transfer(
        endpoint: Endpoint,
        market_id: u64,
        usdc: Decimal,
    ) -> Result<Self, AmountOutOfRange> {
        let micro_usdc =
            to_base_units(usdc, USDC_DECIMALS).ok_or(AmountOutOfRange { value: usdc })?;
        Ok(Self::get(endpoint)
            .with("marketId", market_id.to_string())
            .with("amount", decimal_query_value(micro_usdc)))
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL-encoded query, pairs in insertion order.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }
}

/// Exact decimal text without trailing zeros: `8.0` becomes `8`.
pub fn decimal_query_value(value: Decimal) -> String {
    value.normalize().to_string()
}
