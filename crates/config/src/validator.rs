use crate::*;
use thiserror::Error;
use url::Url;

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
const MAX_POLL_INTERVAL_SECONDS: u64 = 3600;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("scanner.min_annual_rate must be a finite number between -1 and 10, got: {0}")]
    InvalidMinAnnualRate(f64),

    #[error("scanner.settlement_hour must be between 0 and 23, got: {0}")]
    InvalidSettlementHour(u32),

    #[error("scanner.poll_interval_seconds must be at most {max}, got: {value}")]
    InvalidPollInterval { value: u64, max: u64 },

    #[error("Market data: {message}")]
    InvalidMarketData { message: String },

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("market_data.timeout_seconds must be between 1 and 300, got: {0}")]
    InvalidTimeout(u64),

    #[error("Static provider requires market_data.static_snapshot")]
    MissingStaticSnapshot,

    #[error("Storage: {message}")]
    InvalidStorage { message: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &ArbConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_scanner(&config.scanner, &mut report);
    validate_market_data(&config.market_data, &mut report);
    validate_server(&config.server, &mut report);
    validate_storage(&config.storage, &mut report);
    validate_monitoring(&config.monitoring, &mut report);

    report
}

/// Flag string fields still holding a `${VAR}` placeholder
fn check_resolved(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value) {
        report.add_error(ValidationError::InvalidEnvVar {
            var: field.to_string(),
            message: format!("unresolved placeholder in '{}'", value),
        });
    }
}

fn check_not_empty(field: &str, value: &str, report: &mut ValidationReport) {
    if value.trim().is_empty() {
        report.add_error(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }
}

fn validate_scanner(scanner: &ScannerConfig, report: &mut ValidationReport) {
    let rate = scanner.min_annual_rate;
    if !rate.is_finite() || !(-1.0..=10.0).contains(&rate) {
        report.add_error(ValidationError::InvalidMinAnnualRate(rate));
    } else if rate <= 0.0 {
        report.add_warning(
            "scanner.min_annual_rate",
            "Non-positive threshold accepts every quotable pair",
        );
    }

    if scanner.settlement_hour > 23 {
        report.add_error(ValidationError::InvalidSettlementHour(scanner.settlement_hour));
    }

    check_not_empty("scanner.underlying", &scanner.underlying, report);
    check_resolved("scanner.underlying", &scanner.underlying, report);

    match scanner.poll_interval_seconds {
        0 => report.add_warning(
            "scanner.poll_interval_seconds",
            "Background scanning is disabled",
        ),
        s if s > MAX_POLL_INTERVAL_SECONDS => {
            report.add_error(ValidationError::InvalidPollInterval {
                value: s,
                max: MAX_POLL_INTERVAL_SECONDS,
            })
        }
        s if s < 5 => report.add_warning(
            "scanner.poll_interval_seconds",
            "Intervals under 5 seconds may hit exchange rate limits",
        ),
        _ => {}
    }
}

fn validate_market_data(market_data: &MarketDataConfig, report: &mut ValidationReport) {
    match &market_data.base_url {
        Some(url) => validate_base_url(url, report),
        None => report.add_default("market_data.base_url", DEFAULT_OKX_BASE_URL),
    }

    if !(1..=300).contains(&market_data.timeout_seconds) {
        report.add_error(ValidationError::InvalidTimeout(market_data.timeout_seconds));
    }

    check_not_empty("market_data.spot_inst_id", &market_data.spot_inst_id, report);
    check_resolved("market_data.spot_inst_id", &market_data.spot_inst_id, report);
    check_not_empty("market_data.option_family", &market_data.option_family, report);
    check_resolved("market_data.option_family", &market_data.option_family, report);

    match (market_data.provider, &market_data.static_snapshot) {
        (ProviderKind::Static, None) => report.add_error(ValidationError::MissingStaticSnapshot),
        (ProviderKind::Static, Some(snapshot)) => validate_static_snapshot(snapshot, report),
        (ProviderKind::Okx, Some(_)) => report.add_warning(
            "market_data.static_snapshot",
            "Ignored unless provider is 'static'",
        ),
        (ProviderKind::Okx, None) => {}
    }
}

fn validate_base_url(url: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(url) {
        check_resolved("market_data.base_url", url, report);
        return;
    }

    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => report.add_error(ValidationError::InvalidBaseUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}', expected http or https", parsed.scheme()),
        }),
        Err(e) => report.add_error(ValidationError::InvalidBaseUrl {
            url: url.to_string(),
            message: e.to_string(),
        }),
    }
}

fn validate_static_snapshot(snapshot: &StaticSnapshotConfig, report: &mut ValidationReport) {
    if !snapshot.spot_price.is_finite() || snapshot.spot_price <= 0.0 {
        report.add_error(ValidationError::InvalidMarketData {
            message: format!(
                "static_snapshot.spot_price must be positive, got: {}",
                snapshot.spot_price
            ),
        });
    }

    if snapshot.quotes.is_empty() {
        report.add_warning(
            "market_data.static_snapshot.quotes",
            "No quotes defined, every scan will report no data",
        );
    }

    for quote in &snapshot.quotes {
        if quote.inst_id.trim().is_empty() {
            report.add_error(ValidationError::InvalidMarketData {
                message: "static quote with empty inst_id".to_string(),
            });
        }
        let negative = [quote.ask, quote.bid]
            .iter()
            .flatten()
            .any(|p| !p.is_finite() || *p < 0.0);
        if negative {
            report.add_error(ValidationError::InvalidMarketData {
                message: format!("quote {} has a negative or non-finite price", quote.inst_id),
            });
        }
    }
}

fn validate_server(server: &ServerSettings, report: &mut ValidationReport) {
    check_not_empty("server.host", &server.host, report);
    check_resolved("server.host", &server.host, report);

    if server.http_port == 0 {
        report.add_warning("server.http_port", "Port 0 binds an ephemeral port");
    }
}

fn validate_storage(storage: &StorageConfig, report: &mut ValidationReport) {
    match (storage.backend, &storage.path) {
        (StorageBackend::JsonFile, None) => {
            report.add_default("storage.path", DEFAULT_STORAGE_PATH)
        }
        (StorageBackend::JsonFile, Some(path)) if path.trim().is_empty() => {
            report.add_error(ValidationError::InvalidStorage {
                message: "json_file backend requires a non-empty path".to_string(),
            })
        }
        (StorageBackend::JsonFile, Some(path)) => check_resolved("storage.path", path, report),
        (StorageBackend::Memory, _) => report.add_warning(
            "storage.backend",
            "Saved opportunities are lost on restart",
        ),
    }
}

fn validate_monitoring(monitoring: &MonitoringConfig, report: &mut ValidationReport) {
    if !LOG_FORMATS.contains(&monitoring.log_format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(monitoring.log_format.clone()));
    }

    check_not_empty("monitoring.log_level", &monitoring.log_level, report);

    if monitoring.metrics_port == Some(0) {
        report.add_warning("monitoring.metrics_port", "Port 0 binds an ephemeral port");
    }
}
