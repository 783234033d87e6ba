/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Position side. The API encodes long as `tradeSide=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[default]
    Long,
    Short,
}

impl TradeSide {
    pub fn as_query_value(self) -> &'static str {
        match self {
            TradeSide::Long => "true",
            TradeSide::Short => "false",
        }
    }
}

/// Whether an order opens or closes a position. The API encodes close as
/// `direction=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Open,
    Close,
}

impl Direction {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Direction::Open => "false",
            Direction::Close => "true",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

/// Side reported by the order history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySide {
    Buy,
    Sell,
    Unknown,
}

impl HistorySide {
    /// The history feed mixes `buy`/`sell` with book terms `bid`/`ask`.
    pub fn from_api_str(value: &str) -> Self {
        match value {
            "buy" | "bid" => HistorySide::Buy,
            "sell" | "ask" => HistorySide::Sell,
            _ => HistorySide::Unknown,
        }
    }
}
