pub const DEFAULT_OKX_BASE_URL: &str = "https://www.okx.com";
pub const DEFAULT_STORAGE_PATH: &str = "saved_opportunities.json";

pub fn default_min_annual_rate() -> f64 {
    0.05
}

pub fn default_settlement_hour() -> u32 {
    16
}

pub fn default_underlying() -> String {
    "BTC-USD".to_string()
}

pub fn default_poll_interval_seconds() -> u64 {
    30
}

pub fn default_provider() -> super::ProviderKind {
    super::ProviderKind::Okx
}

pub fn default_spot_inst_id() -> String {
    "BTC-USD".to_string()
}

pub fn default_option_family() -> String {
    "BTC-USD".to_string()
}

pub fn default_timeout_seconds() -> u64 {
    10
}

// Server defaults
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8000
}

pub fn default_storage_backend() -> super::StorageBackend {
    super::StorageBackend::JsonFile
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
