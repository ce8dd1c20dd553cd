use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "parb")]
#[command(about = "Parb - BTC options put-call parity arbitrage monitor")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Log output format, overrides monitoring.log_format
    #[arg(long, global = true, value_enum, env = "PARB_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dashboard API and the background scanner
    Serve {
        /// Path to the configuration file
        #[arg(short, long, default_value = "parb.yaml")]
        config: PathBuf,

        /// Override HTTP port
        #[arg(long)]
        http: Option<u16>,
    },

    /// Run a single scan and print the accepted opportunities
    Scan {
        /// Path to the configuration file
        #[arg(short, long, default_value = "parb.yaml")]
        config: PathBuf,

        /// Override the minimum annual rate, e.g. 0.1 for 10%
        #[arg(long, allow_negative_numbers = true)]
        min_rate: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration without starting anything
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "parb.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "parb.yaml")]
        output: PathBuf,
    },
}

impl Commands {
    /// Configuration file read by the command, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Serve { config, .. }
            | Commands::Scan { config, .. }
            | Commands::Validate { config } => Some(config),
            Commands::Init { .. } => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per line
    Json,
    /// Single-line
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["parb", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { config, http } => {
                assert_eq!(config, PathBuf::from("parb.yaml"));
                assert_eq!(http, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::try_parse_from([
            "parb", "scan", "-c", "alt.yaml", "--min-rate", "0.1", "--json", "--log-format", "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        match cli.command {
            Commands::Scan { config, min_rate, json } => {
                assert_eq!(config, PathBuf::from("alt.yaml"));
                assert_eq!(min_rate, Some(0.1));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_min_rate() {
        let cli = Cli::try_parse_from(["parb", "scan", "--min-rate", "-0.02"]).unwrap();
        assert!(matches!(cli.command, Commands::Scan { min_rate: Some(r), .. } if r == -0.02));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::try_parse_from(["parb", "validate", "--config", "x.yaml"]).unwrap();
        assert_eq!(cli.command.config_path(), Some(Path::new("x.yaml")));

        let cli = Cli::try_parse_from(["parb", "init"]).unwrap();
        assert_eq!(cli.command.config_path(), None);
    }

    #[test]
    fn test_unknown_log_format() {
        assert!(Cli::try_parse_from(["parb", "--log-format", "xml", "validate"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
