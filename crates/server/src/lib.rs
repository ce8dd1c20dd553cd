//! Server infrastructure for the parity arbitrage monitor
//!
//! Provides the HTTP server, health endpoints and graceful shutdown used by
//! the `parb serve` command.
//!
//! # Architecture
//!
//! Servers implement the [`Server`] trait; [`ServerExt`] adds `spawn()`
//! and `run_until()`. Shutdown is coordinated with `CancellationToken`
//! from `tokio_util`: cancelling the root token held by a
//! [`ShutdownController`] cancels every child token handed out to the HTTP
//! server and background tasks.
//!
//! # Modules
//!
//! - [`config`] - Bind configuration
//! - [`traits`] - `Server` and `ServerExt` traits
//! - [`http`] - HTTP server using Axum
//! - [`health`] - Health check endpoints
//! - [`shutdown`] - Graceful shutdown utilities
//! - [`port_validator`] - Early port availability checks

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{health_routes, HealthState, UpstreamStatus};
pub use http::HttpServer;
pub use port_validator::validate_port_available;
pub use shutdown::{run_until_shutdown, ShutdownController};
pub use traits::{Server, ServerExt};
