//! Tailing configuration.

use std::time::Duration;

/// Configuration for a tailing reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailConfig {
    /// Sleep between polls.
    pub poll_interval: Duration,

    /// Offset to resume from (an externally stored checkpoint).
    pub start_offset: u64,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            start_offset: 0,
        }
    }
}

impl TailConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the start offset.
    #[must_use]
    pub const fn with_start_offset(mut self, offset: u64) -> Self {
        self.start_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TailConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.start_offset, 0);
    }

    #[test]
    fn builder_pattern() {
        let config = TailConfig::new()
            .with_poll_interval(Duration::from_millis(50))
            .with_start_offset(170);

        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.start_offset, 170);
    }
}
