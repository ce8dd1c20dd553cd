//! Parity arbitrage monitor CLI and server binary
//!
//! Entry point for scanning BTC options for put-call parity deviations,
//! serving the dashboard API, and managing the configuration file.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arbitrage::{
    create_router, group_by_expiry, ArbitrageApiState, ArbitrageScanner,
    InMemoryOpportunityStore, JsonFileOpportunityStore, OpportunityStore, ScanMonitor, ScanReport,
};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config, save_config, validate_config, ArbConfig,
    MarketDataConfig, MonitoringConfig, ProviderKind, StorageBackend, StorageConfig,
};
use market_data::{MarketDataProvider, OkxProvider, OptionQuote, StaticProvider};
use observability::{init_logging, init_logging_with_level, init_metrics, LogFormat};
use server::{
    validate_port_available, HealthState, HttpServer, ServerConfig, ServerExt, ShutdownController,
};
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // The config file decides the log format unless --log-format is given
    let loaded = cli.command.config_path().map(load_config);
    let monitoring = loaded
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|c| c.monitoring.clone())
        .unwrap_or_default();
    setup_logging(cli.log_format.map(|f| f.as_str()), &monitoring)?;

    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Serve { http, .. } => {
            info!("Executing 'serve' command");
            serve_command(require_config(loaded)?, http).await
        }
        Commands::Scan { min_rate, json, .. } => {
            info!("Executing 'scan' command");
            scan_command(require_config(loaded)?, min_rate, json).await
        }
        Commands::Validate { .. } => {
            info!("Executing 'validate' command");
            validate_command(require_config(loaded)?)
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output)
        }
    }
}

fn setup_logging(flag: Option<&str>, monitoring: &MonitoringConfig) -> Result<()> {
    let format = LogFormat::parse(flag.unwrap_or(monitoring.log_format.as_str())).unwrap_or_default();

    if let Err(e) = init_logging_with_level("parb", format, &monitoring.log_level) {
        init_logging("parb", format)?;
        warn!(error = %e, level = %monitoring.log_level, "Invalid log level, using info");
    }
    Ok(())
}

fn require_config(loaded: Option<Result<ArbConfig>>) -> Result<ArbConfig> {
    match loaded {
        Some(Ok(config)) => Ok(config),
        Some(Err(e)) => {
            error!(error = %e, "Failed to load configuration");
            Err(e)
        }
        None => anyhow::bail!("Command does not take a configuration file"),
    }
}

/// Log warnings, fail on errors
fn ensure_valid(config: &ArbConfig) -> Result<()> {
    let report = validate_config(config);

    if !report.warnings.is_empty() {
        warn!("Configuration warnings:");
        for warning in &report.warnings {
            warn!(field = %warning.field, message = %warning.message);
        }
    }

    for default in &report.defaults_applied {
        debug!(field = %default.field, value = %default.value, "Default applied");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start due to configuration errors");
    }

    Ok(())
}

fn build_provider(market_data: &MarketDataConfig) -> Result<Arc<dyn MarketDataProvider>> {
    match market_data.provider {
        ProviderKind::Okx => {
            let provider = OkxProvider::new(
                market_data.base_url(),
                Duration::from_secs(market_data.timeout_seconds),
            )?
            .with_spot_inst_id(market_data.spot_inst_id.clone())
            .with_option_family(market_data.option_family.clone());
            Ok(Arc::new(provider))
        }
        ProviderKind::Static => {
            let snapshot = market_data
                .static_snapshot
                .as_ref()
                .context("Static provider requires market_data.static_snapshot")?;
            let quotes = snapshot
                .quotes
                .iter()
                .map(|q| OptionQuote::new(q.inst_id.clone(), q.ask, q.bid))
                .collect();
            Ok(Arc::new(StaticProvider::new(snapshot.spot_price, quotes)))
        }
    }
}

fn upstream_endpoint(market_data: &MarketDataConfig) -> String {
    match market_data.provider {
        ProviderKind::Okx => market_data.base_url().to_string(),
        ProviderKind::Static => "static".to_string(),
    }
}

async fn build_store(storage: &StorageConfig) -> Result<Arc<dyn OpportunityStore>> {
    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryOpportunityStore::new())),
        StorageBackend::JsonFile => {
            let store = JsonFileOpportunityStore::open(storage.path())
                .await
                .with_context(|| format!("Failed to open store at {}", storage.path()))?;
            Ok(Arc::new(store))
        }
    }
}

fn build_scanner(config: &ArbConfig) -> Result<Arc<ArbitrageScanner>> {
    let provider = build_provider(&config.market_data)?;
    Ok(Arc::new(
        ArbitrageScanner::new(provider).with_settlement_hour(config.scanner.settlement_hour),
    ))
}

async fn serve_command(config: ArbConfig, http_override: Option<u16>) -> Result<()> {
    ensure_valid(&config)?;

    if let Some(port) = config.monitoring.metrics_port {
        init_metrics(port)?;
    }

    let http_port = http_override.unwrap_or(config.server.http_port);
    if http_override.is_none() {
        debug!(port = http_port, "Using configured HTTP port");
    }

    let scanner = build_scanner(&config)?;
    let store = build_store(&config.storage).await?;
    let health = Arc::new(HealthState::new("parb"));

    let state = ArbitrageApiState::new(scanner, store, health, config.scanner.min_annual_rate)
        .with_upstream_endpoint(upstream_endpoint(&config.market_data));

    let server_config = ServerConfig::new(config.server.host.clone(), http_port);
    validate_port_available(&server_config).await?;

    info!(
        underlying = %config.scanner.underlying,
        provider = %config.market_data.provider,
        min_annual_rate = config.scanner.min_annual_rate,
        http_port,
        "Starting parity arbitrage monitor"
    );

    let shutdown = ShutdownController::with_ctrl_c();

    let monitor = match config.scanner.poll_interval_seconds {
        0 => None,
        secs => {
            let monitor = ScanMonitor::new(state.clone(), Duration::from_secs(secs));
            Some(tokio::spawn(monitor.run(shutdown.child_token())))
        }
    };

    let server = HttpServer::new(server_config, create_router(state));
    let result = server.run_until(shutdown.child_token()).await;

    // Stop the monitor too if the server exited on its own
    shutdown.shutdown();
    if let Some(handle) = monitor {
        match handle.await {
            Ok(scans) => debug!(scans, "Background scanner joined"),
            Err(e) => warn!(error = %e, "Background scanner task failed"),
        }
    }

    result?;
    info!("Shutdown complete");
    Ok(())
}

async fn scan_command(config: ArbConfig, min_rate: Option<f64>, json: bool) -> Result<()> {
    ensure_valid(&config)?;

    let min_rate = min_rate.unwrap_or(config.scanner.min_annual_rate);
    if !min_rate.is_finite() {
        anyhow::bail!("--min-rate must be a finite number");
    }

    let scanner = build_scanner(&config)?;
    let report = scanner.scan(min_rate).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&config.scanner.underlying, &report);
    }

    if !report.data_available {
        warn!(provider = scanner.provider_name(), "No market data available, reported an empty scan");
    }
    Ok(())
}

fn print_report(underlying: &str, report: &ScanReport) {
    println!("\n=== {} Parity Scan ===\n", underlying);

    if !report.data_available {
        println!("[warn] No market data available");
        return;
    }

    println!("Spot: {:.2}", report.spot_price);
    println!("Minimum annual rate: {:.2}%", report.min_annual_rate * 100.0);
    println!(
        "Quotes: {}  Pairs: {}  Quotable: {}  Accepted: {}",
        report.stats.quotes,
        report.stats.pairs,
        report.stats.quotable_pairs,
        report.stats.accepted
    );

    if report.opportunities.is_empty() {
        println!("\nNo opportunities above the threshold.");
        return;
    }

    for (expiry, opportunities) in group_by_expiry(report.opportunities.iter().cloned()) {
        println!("\nExpiry {} ({:.1} days)", expiry, opportunities[0].days_to_expiry);
        println!(
            "  {:>10}  {:>12}  {:>9}  {:>12}  {:>9}  {:>10}",
            "strike", "synth long", "long %", "synth short", "short %", "opp cost"
        );
        for o in &opportunities {
            println!(
                "  {:>10.0}  {:>12.2}  {:>8.2}%  {:>12.2}  {:>8.2}%  {:>10.2}",
                o.strike_price,
                o.synthetic_long_price,
                o.long_annual_rate * 100.0,
                o.synthetic_short_price,
                o.short_annual_rate * 100.0,
                o.opportunity_cost
            );
        }
    }
    println!();
}

fn validate_command(config: ArbConfig) -> Result<()> {
    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Underlying: {}", config.scanner.underlying);
    println!(
        "Minimum annual rate: {:.2}%",
        config.scanner.min_annual_rate * 100.0
    );
    println!("Provider: {}", config.market_data.provider);
    println!("HTTP: {}:{}", config.server.host, config.server.http_port);

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit the threshold and market data settings");
    println!(
        "  2. Run 'parb validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'parb serve --config {:?}' to start the dashboard API",
        output_path
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{StaticQuoteConfig, StaticSnapshotConfig};

    fn static_config(quotes: Vec<StaticQuoteConfig>) -> ArbConfig {
        let mut config = ArbConfig::default();
        config.market_data.provider = ProviderKind::Static;
        config.market_data.static_snapshot = Some(StaticSnapshotConfig {
            spot_price: 65000.0,
            quotes,
        });
        config
    }

    #[tokio::test]
    async fn test_scan_without_market_data_succeeds() {
        // An empty chain is "no data" for the scanner
        assert!(scan_command(static_config(Vec::new()), None, false).await.is_ok());
        assert!(scan_command(static_config(Vec::new()), Some(0.1), true).await.is_ok());
    }

    #[tokio::test]
    async fn test_scan_rejects_non_finite_rate() {
        let quotes = vec![StaticQuoteConfig {
            inst_id: "BTC-USD-991231-60000-C".to_string(),
            ask: Some(0.05),
            bid: Some(0.04),
        }];
        assert!(scan_command(static_config(quotes.clone()), Some(0.05), false).await.is_ok());
        assert!(scan_command(static_config(quotes), Some(f64::NAN), false).await.is_err());
    }
}
