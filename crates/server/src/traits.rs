//! Server traits
//!
//! [`Server`] is the lifecycle interface every server implements;
//! [`ServerExt`] adds spawning and token-driven runs on top.

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Core server trait.
///
/// # Implementors
///
/// - [`HttpServer`](crate::http::HttpServer) - HTTP server using Axum
#[async_trait]
pub trait Server: Send + Sync + 'static {
    /// Server name for logging and identification
    fn name(&self) -> &str;

    /// Bound address while running, `None` otherwise
    fn address(&self) -> Option<SocketAddr>;

    /// Returns true if the server is currently running
    fn is_running(&self) -> bool;

    /// Runs the server until `shutdown` is cancelled.
    ///
    /// Binds, serves until cancellation, drains in-flight requests and
    /// returns `Ok(())` on a clean shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or hits a fatal I/O error.
    async fn run(&self, shutdown: CancellationToken) -> Result<()>;
}

/// Convenience methods, implemented for every [`Server`]
pub trait ServerExt: Server + Sized {
    /// Spawn the server on a new task.
    ///
    /// Returns the task handle and the token that stops it.
    fn spawn(self) -> (tokio::task::JoinHandle<Result<()>>, CancellationToken) {
        let token = CancellationToken::new();
        let token_clone = token.clone();
        let handle = tokio::spawn(async move { self.run(token_clone).await });
        (handle, token)
    }

    /// Run until `token` is cancelled
    fn run_until(self, token: CancellationToken) -> impl std::future::Future<Output = Result<()>> + Send {
        async move { self.run(token).await }
    }
}

impl<T: Server + Sized> ServerExt for T {}
