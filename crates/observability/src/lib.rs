//! Observability infrastructure for the parity arbitrage monitor
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics
//! - Scan metric helpers
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! // Initialize logging
//! init_logging("parb", LogFormat::Pretty)?;
//!
//! // Initialize metrics (optional)
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, init_logging_with_level, LogFormat};
pub use metrics::{init_metrics, ScanMetrics, ScanTimer};
