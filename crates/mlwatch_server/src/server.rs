//! Listener lifecycle shared by the dashboard and the collector.

use crate::error::{ServerError, ServerResult};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// A running HTTP server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<ServerResult<()>>,
}

impl ServerHandle {
    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections, lets in-flight requests finish and
    /// waits for the server task to exit.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the server, or
    /// [`ServerError::TaskFailed`] if the task panicked.
    pub async fn shutdown(self) -> ServerResult<()> {
        let _ = self.shutdown_tx.send(());
        self.join
            .await
            .map_err(|e| ServerError::TaskFailed(e.to_string()))?
    }
}

/// Binds `addr` and serves `router` on a background task.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound.
pub async fn serve(router: Router, addr: SocketAddr, name: &'static str) -> ServerResult<ServerHandle> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener.local_addr()?;
    info!("Starting {} HTTP server on {}", name, local_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                // A dropped sender also shuts down.
                let _ = shutdown_rx.await;
            })
            .await?;
        info!("{} server shut down gracefully", name);
        Ok::<(), ServerError>(())
    });

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        join,
    })
}
