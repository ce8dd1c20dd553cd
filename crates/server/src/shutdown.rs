//! Graceful shutdown utilities using CancellationToken
//!
//! One controller owns the root token. Servers and background loops get
//! child tokens, so cancelling the root stops everything while a child can
//! still be cancelled on its own.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Coordinates shutdown across the HTTP server and background tasks.
///
/// # Example
///
/// ```ignore
/// let shutdown = ShutdownController::with_ctrl_c();
///
/// tokio::spawn(monitor.run(shutdown.child_token()));
/// server.run_until(shutdown.child_token()).await?;
/// ```
#[derive(Clone)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Controller cancelled by Ctrl+C.
    ///
    /// Spawns a background task, so it must be called inside a runtime.
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown...");
                    token.cancel();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        controller
    }

    /// Token cancelled together with this controller
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Clone of the root token
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger shutdown manually
    pub fn shutdown(&self) {
        info!("Manual shutdown triggered");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for shutdown to be triggered (either Ctrl+C or manual)
    pub async fn wait_for_shutdown(&self) {
        self.token.cancelled().await;
    }
}

/// Run `future` unless shutdown comes first.
///
/// Returns `Some(result)` if the future completed, `None` if shutdown was
/// triggered first.
pub async fn run_until_shutdown<F, T>(token: CancellationToken, future: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = future => Some(result),
        _ = token.cancelled() => None,
    }
}
