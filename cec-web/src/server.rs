//! HTTP server lifecycle

use crate::context::GatewayContext;
use crate::routes;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::info;

/// Server startup/shutdown errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: SocketAddr, reason: String },
}

/// The running gateway HTTP server
///
/// Binds eagerly (so startup failures surface immediately), serves on a
/// background task, and shuts down gracefully when asked, finishing
/// in-flight requests first.
pub struct GatewayServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl GatewayServer {
    /// Binds `listen` and starts serving the gateway routes.
    pub fn start(listen: SocketAddr, context: GatewayContext) -> Result<Self, ServerError> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let (addr, server) = warp::serve(routes::routes(context))
            .try_bind_with_graceful_shutdown(listen, async move {
                let _ = shutdown_rx.await;
            })
            .map_err(|e| ServerError::Bind {
                addr: listen,
                reason: e.to_string(),
            })?;

        info!(%addr, "Gateway listening");
        let server_handle = tokio::spawn(server);

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    /// The address the server actually bound (port 0 resolves here).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for clients of this server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting connections, waits for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }
    }

    /// Runs until the task is cancelled or the process receives ctrl-c.
    pub async fn run_until_ctrl_c(self) {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down");
        self.shutdown().await;
    }
}
