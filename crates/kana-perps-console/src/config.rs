/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed, validated console configuration
[POS]:    Configuration layer - API endpoint, market, networks, timing
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use kana_perps_adapter::{ClientConfig, TRADE_API_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflow::{DEFAULT_EXPLORER_BASE_URL, WorkflowSettings, default_sendable_networks};

/// Allowed post-settlement refresh delay, in milliseconds
pub const REFRESH_DELAY_RANGE_MS: std::ops::RangeInclusive<u64> = 3_000..=5_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be between 3000 and 5000 ms, got {value}")]
    RefreshDelayOutOfRange { field: &'static str, value: u64 },

    #[error("sendable_networks must name at least one network")]
    NoSendableNetworks,

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Top-level configuration for the console
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Trade API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Market base name, e.g. "APT/USDC"
    #[serde(default = "default_market")]
    pub market: String,
    /// Networks orders may be sent from
    #[serde(default = "default_sendable_networks")]
    pub sendable_networks: Vec<String>,
    #[serde(default = "default_explorer_base_url")]
    pub explorer_base_url: String,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshConfig {
    #[serde(default = "default_order_delay_ms")]
    pub order_delay_ms: u64,
    #[serde(default = "default_transfer_delay_ms")]
    pub transfer_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            market: default_market(),
            sendable_networks: default_sendable_networks(),
            explorer_base_url: default_explorer_base_url(),
            refresh: RefreshConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            order_delay_ms: default_order_delay_ms(),
            transfer_delay_ms: default_transfer_delay_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    TRADE_API_BASE_URL.to_string()
}

fn default_market() -> String {
    "APT/USDC".to_string()
}

fn default_explorer_base_url() -> String {
    DEFAULT_EXPLORER_BASE_URL.to_string()
}

fn default_order_delay_ms() -> u64 {
    5_000
}

fn default_transfer_delay_ms() -> u64 {
    3_000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl ConsoleConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "api_base_url",
            });
        }
        if self.market.trim().is_empty() {
            return Err(ConfigError::Empty { field: "market" });
        }
        if self.sendable_networks.iter().all(|name| name.trim().is_empty()) {
            return Err(ConfigError::NoSendableNetworks);
        }

        for (field, value) in [
            ("refresh.order_delay_ms", self.refresh.order_delay_ms),
            ("refresh.transfer_delay_ms", self.refresh.transfer_delay_ms),
        ] {
            if !REFRESH_DELAY_RANGE_MS.contains(&value) {
                return Err(ConfigError::RefreshDelayOutOfRange { field, value });
            }
        }

        for (field, value) in [
            ("http.timeout_secs", self.http.timeout_secs),
            ("http.connect_timeout_secs", self.http.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout { field });
            }
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
        }
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            sendable_networks: self
                .sendable_networks
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            explorer_base_url: self.explorer_base_url.clone(),
            order_refresh_delay: Duration::from_millis(self.refresh.order_delay_ms),
            transfer_refresh_delay: Duration::from_millis(self.refresh.transfer_delay_ms),
        }
    }
}
