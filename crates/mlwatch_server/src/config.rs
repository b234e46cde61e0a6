//! Server and agent configuration.

use mlwatch_core::TailConfig;
use mlwatch_forward::ForwarderConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default port for both the dashboard and the collector.
pub const DEFAULT_PORT: u16 = 5000;

/// Refresh interval the page uses when polling `GET /logs`.
const DEFAULT_PAGE_POLL: Duration = Duration::from_secs(15);

/// Configuration for the local dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// How often the page polls for new records.
    pub poll_interval: Duration,
}

impl DashboardConfig {
    /// Creates a dashboard configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            poll_interval: DEFAULT_PAGE_POLL,
        }
    }

    /// Sets the page poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the port, keeping the host.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
    }
}

/// Configuration for the remote collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// How often the page polls for records.
    pub poll_interval: Duration,
}

impl CollectorConfig {
    /// Creates a collector configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            poll_interval: DEFAULT_PAGE_POLL,
        }
    }

    /// Sets the port, keeping the host.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
    }
}

/// Where an agent sends its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentMode {
    /// Serve an in-process dashboard.
    Local(DashboardConfig),
    /// Post to a remote collector at `url`.
    Remote {
        /// Collector base URL.
        url: String,
    },
}

/// Configuration for an [`crate::Agent`].
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Log file to tail.
    pub log_path: PathBuf,
    /// Tailing configuration.
    pub tail: TailConfig,
    /// Forwarding configuration.
    pub forwarder: ForwarderConfig,
    /// Destination.
    pub mode: AgentMode,
}

impl AgentConfig {
    /// Creates a local-mode configuration.
    pub fn local(log_path: impl Into<PathBuf>, dashboard: DashboardConfig) -> Self {
        Self::new(log_path, AgentMode::Local(dashboard))
    }

    /// Creates a remote-mode configuration.
    pub fn remote(log_path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self::new(log_path, AgentMode::Remote { url: url.into() })
    }

    fn new(log_path: impl Into<PathBuf>, mode: AgentMode) -> Self {
        Self {
            log_path: log_path.into(),
            tail: TailConfig::default(),
            forwarder: ForwarderConfig::default(),
            mode,
        }
    }

    /// Sets the tailing configuration.
    pub fn with_tail(mut self, tail: TailConfig) -> Self {
        self.tail = tail;
        self
    }

    /// Sets the forwarding configuration.
    pub fn with_forwarder(mut self, forwarder: ForwarderConfig) -> Self {
        self.forwarder = forwarder;
        self
    }
}
