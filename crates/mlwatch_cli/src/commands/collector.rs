//! Collector command implementation.

use super::signal::shutdown_signal;
use mlwatch_server::{CollectorConfig, CollectorServer, LogStore};
use std::net::SocketAddr;
use std::sync::Arc;

/// Serves the collector until interrupted.
pub async fn run(bind_addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(LogStore::new());
    let server = CollectorServer::start(&CollectorConfig::new(bind_addr), Arc::clone(&store)).await?;
    println!("Collector at http://{}/", server.local_addr());

    shutdown_signal().await?;
    server.shutdown().await?;

    println!("{} records collected", store.len());
    Ok(())
}
