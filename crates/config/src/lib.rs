use serde::{Deserialize, Serialize};
use std::fmt;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    /// Acceptance threshold on the better of the two annualised rates
    #[serde(default = "default_min_annual_rate")]
    pub min_annual_rate: f64,
    /// Local hour at which options settle on their expiry date
    #[serde(default = "default_settlement_hour")]
    pub settlement_hour: u32,
    #[serde(default = "default_underlying")]
    pub underlying: String,
    /// Background scan interval used by `serve`. 0 disables it.
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_annual_rate: default_min_annual_rate(),
            settlement_hour: default_settlement_hour(),
            underlying: default_underlying(),
            poll_interval_seconds: default_poll_interval_seconds(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Okx,
    Static,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Okx => write!(f, "okx"),
            ProviderKind::Static => write!(f, "static"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketDataConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    /// REST base URL, defaults to the public OKX endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    /// Instrument whose best bid is used as spot
    #[serde(default = "default_spot_inst_id")]
    pub spot_inst_id: String,
    #[serde(default = "default_option_family")]
    pub option_family: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Fixed prices served by the `static` provider
    #[serde(default)]
    pub static_snapshot: Option<StaticSnapshotConfig>,
}

impl MarketDataConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_OKX_BASE_URL)
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            spot_inst_id: default_spot_inst_id(),
            option_family: default_option_family(),
            timeout_seconds: default_timeout_seconds(),
            static_snapshot: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticSnapshotConfig {
    pub spot_price: f64,
    #[serde(default)]
    pub quotes: Vec<StaticQuoteConfig>,
}

/// One option quote, prices in underlying units
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticQuoteConfig {
    pub inst_id: String,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub bid: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    JsonFile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,
    /// File used by the `json_file` backend
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_STORAGE_PATH)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Prometheus exporter port, disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            metrics_port: None,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArbConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}
