//! Configuration for the forwarder.

use std::time::Duration;

/// Configuration for a [`crate::Forwarder`] and its HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    /// Time between drains of the entry queue.
    pub interval: Duration,
    /// Per-request timeout for remote delivery.
    pub request_timeout: Duration,
}

impl ForwarderConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(15),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the drain interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self::new()
    }
}
