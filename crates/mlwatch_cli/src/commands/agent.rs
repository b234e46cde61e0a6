//! Agent command implementation.

use super::signal::shutdown_signal;
use mlwatch_core::TailConfig;
use mlwatch_forward::ForwarderConfig;
use mlwatch_server::{Agent, AgentConfig, DashboardConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Options for the agent command.
#[derive(Debug)]
pub struct AgentOptions {
    /// Collector base URL; serve a local dashboard when absent.
    pub remote: Option<String>,
    /// Dashboard bind address.
    pub bind_addr: SocketAddr,
    /// Tail poll interval.
    pub poll_interval: Duration,
    /// Forwarding interval.
    pub forward_interval: Duration,
}

/// Runs tailing and forwarding until interrupted or the log turns corrupt.
pub async fn run(path: &Path, options: AgentOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = match options.remote {
        Some(url) => AgentConfig::remote(path, url),
        None => AgentConfig::local(
            path,
            DashboardConfig::new(options.bind_addr).with_poll_interval(options.forward_interval),
        ),
    }
    .with_tail(TailConfig::new().with_poll_interval(options.poll_interval))
    .with_forwarder(ForwarderConfig::new().with_interval(options.forward_interval));

    let agent = Agent::start(config).await?;
    if let Some(addr) = agent.dashboard_addr() {
        println!("Dashboard at http://{addr}/");
    }

    let tail_exit = async {
        while !agent.tail_finished() {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    };
    tokio::select! {
        result = shutdown_signal() => result?,
        () = tail_exit => warn!("tail task exited; shutting down"),
    }

    let report = agent.shutdown().await?;
    println!(
        "Forwarded {} records ({} dropped), stopped at byte {}",
        report.forwarded.records_delivered, report.forwarded.records_dropped, report.offset
    );
    Ok(())
}
