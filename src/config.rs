use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::ledger::models::{ActionIntent, Network, ProcessingMode};

pub const DEFAULT_CONFIG_PATH: &str = "router.toml";
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 10_000;

/// Session configuration, fixed for the lifetime of a monitor
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct RouterConfig {
    /// Instance name used in the start-up report
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub network: Network,
    #[serde(default = "default_polling_interval")]
    #[validate(range(min = 1))]
    pub polling_interval_ms: u64,
    #[validate(length(min = 1), custom = "validate_hex")]
    pub script_cbor: String,
    pub script_target: ProcessingMode,
    /// Reclaim requests instead of routing them
    #[serde(default)]
    pub reclaim: bool,
    /// Suppress warning logs
    #[serde(default)]
    pub quiet: bool,
    #[validate(length(min = 1))]
    pub route_destination: String,
    pub simple_route_config: Option<Value>,
    pub advanced_route_config: Option<Value>,
    pub advanced_reclaim_config: Option<Value>,
    #[serde(default)]
    #[validate]
    pub ledger: LedgerSettings,
}

/// Where the transaction-building service lives
#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct LedgerSettings {
    #[validate(url)]
    pub url: String,
    pub api_key: Option<String>,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3030".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

fn default_label() -> String {
    "Smart Handles".to_string()
}

fn default_polling_interval() -> u64 {
    DEFAULT_POLLING_INTERVAL_MS
}

fn validate_hex(value: &str) -> Result<(), ValidationError> {
    hex::decode(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("hex"))
}

impl RouterConfig {
    /// Load from `path` (or `$ROUTER_CONFIG`, or `router.toml`) overlaid by
    /// `ROUTER_*` environment variables. Nested keys use `__`, e.g.
    /// `ROUTER_LEDGER__URL`.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("ROUTER_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("ROUTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Self::from_settings(settings)
    }

    /// Parse an in-memory document, e.g. a TOML or JSON string
    pub fn from_source(source: &str, format: config::FileFormat) -> AppResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, format))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> AppResult<Self> {
        let config: RouterConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn mode(&self) -> ProcessingMode {
        self.script_target
    }

    pub fn intent(&self) -> ActionIntent {
        if self.reclaim {
            ActionIntent::Reclaim
        } else {
            ActionIntent::Route
        }
    }

    pub fn polling_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.polling_interval_ms)
    }
}
