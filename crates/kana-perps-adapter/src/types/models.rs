/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::HistorySide;

/// Decimal places of USDC balances reported in base units.
pub const USDC_DECIMALS: u32 = 6;
/// Decimal places of APT balances reported in octas.
pub const APT_DECIMALS: u32 = 8;
/// Order history prices are reported in thousandths of a USDC.
pub const HISTORY_PRICE_DIVISOR: i64 = 1_000;

/// Convert an integer amount in base units into whole units.
pub fn from_base_units(raw: Decimal, decimals: u32) -> Decimal {
    raw / Decimal::from(10_u64.pow(decimals))
}

/// Convert whole units into base units for the transfer endpoints.
///
/// `None` when the result does not fit in a `Decimal`.
pub fn to_base_units(value: Decimal, decimals: u32) -> Option<Decimal> {
    value.checked_mul(Decimal::from(10_u64.pow(decimals)))
}

/// Entry function call returned by the trade API, ready for the wallet.
///
/// The console never inspects the arguments; they are forwarded to the
/// signer exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub function_arguments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    #[serde(deserialize_with = "serde_helpers::deserialize_u64_from_any")]
    pub market_id: u64,
    pub base_name: String,
    #[serde(default)]
    pub base_decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    #[serde(deserialize_with = "serde_helpers::deserialize_string_from_any")]
    pub market_order_id: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub market_size: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub market_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub leverage: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_option")]
    pub take_profit: Option<Decimal>,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_option")]
    pub stop_loss: Option<Decimal>,
}

/// Open orders split by book side, as returned by `/openOrders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenOrderBook {
    #[serde(default)]
    pub asks: Vec<OpenOrder>,
    #[serde(default)]
    pub bids: Vec<OpenOrder>,
}

impl OpenOrderBook {
    /// Asks first, then bids.
    pub fn into_orders(self) -> Vec<OpenOrder> {
        let mut orders = self.asks;
        orders.extend(self.bids);
        orders
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    #[serde(deserialize_with = "serde_helpers::deserialize_string_from_any")]
    pub order_id: String,
    #[serde(default)]
    pub direction: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub leverage: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub total_filled: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub average_execution_price: Decimal,
    #[serde(default)]
    pub order_type: String,
}

impl OrderHistoryEntry {
    pub fn side(&self) -> HistorySide {
        HistorySide::from_api_str(&self.direction)
    }

    pub fn is_limit(&self) -> bool {
        self.order_type == "limit"
    }

    /// Average execution price in USDC, rounded to three places.
    pub fn average_price_usdc(&self) -> Decimal {
        (self.average_execution_price / Decimal::from(HISTORY_PRICE_DIVISOR)).round_dp(3)
    }

    /// First two and last three characters of the order id, e.g. `12...789`.
    pub fn short_order_id(&self) -> String {
        let chars: Vec<char> = self.order_id.chars().collect();
        if chars.len() <= 5 {
            return self.order_id.clone();
        }
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 3..].iter().collect();
        format!("{head}...{tail}")
    }
}

/// Balances of one account for one market, in whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccountBalances {
    pub trading_usdc: Decimal,
    pub wallet_usdc: Decimal,
    pub apt: Decimal,
}

mod serde_helpers {
    use super::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    fn decimal_from_value<E: serde::de::Error>(value: &Value) -> Result<Option<Decimal>, E> {
        if value.is_null() {
            return Ok(None);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            return Decimal::from_str(raw.trim()).map(Some).map_err(E::custom);
        }

        if value.is_number() {
            return Decimal::from_str(&value.to_string())
                .or_else(|_| Decimal::from_scientific(&value.to_string()))
                .map(Some)
                .map_err(E::custom);
        }

        Err(E::custom("invalid decimal value"))
    }

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(decimal_from_value::<D::Error>(&value)?.unwrap_or(Decimal::ZERO))
    }

    pub fn deserialize_decimal_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decimal_from_value::<D::Error>(&value)
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize_string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => Ok(raw),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }

    pub fn deserialize_u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
            Value::Number(number) => number
                .as_u64()
                .ok_or_else(|| serde::de::Error::custom("market id must be a positive integer")),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }
}
