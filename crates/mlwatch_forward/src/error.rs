//! Error types for the forwarder.

use thiserror::Error;

/// Result type for forwarding operations.
pub type ForwardResult<T> = Result<T, ForwardError>;

/// Errors that can occur while forwarding records.
#[derive(Error, Debug)]
pub enum ForwardError {
    /// The collector did not answer the startup reachability check.
    #[error("dashboard unreachable at {url}: {reason}")]
    DashboardUnreachable {
        /// Base URL that was probed.
        url: String,
        /// Status code or transport failure.
        reason: String,
    },

    /// A batch was not accepted by the collector.
    ///
    /// Never escalated by the forwarder: the batch is logged and dropped.
    #[error("delivery failed{}: {message}", status_suffix(.status))]
    Delivery {
        /// Response status, if a response was received.
        status: Option<u16>,
        /// Failure description.
        message: String,
    },

    /// The HTTP client could not be built or the request could not be sent.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The collector URL is not a valid absolute http(s) URL.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The forwarder task panicked or was cancelled.
    #[error("forwarder task failed: {0}")]
    TaskFailed(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

impl ForwardError {
    /// Creates a delivery error for an unexpected response status.
    pub fn unexpected_status(status: u16) -> Self {
        Self::Delivery {
            status: Some(status),
            message: "unexpected response status".into(),
        }
    }

    /// Returns true if this error means a batch was dropped.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, Self::Delivery { .. } | Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_display() {
        assert_eq!(
            ForwardError::unexpected_status(500).to_string(),
            "delivery failed with status 500: unexpected response status"
        );
        let err = ForwardError::Delivery {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "delivery failed: connection refused");
    }

    #[test]
    fn delivery_classification() {
        assert!(ForwardError::unexpected_status(404).is_delivery_failure());
        assert!(ForwardError::Http("reset".into()).is_delivery_failure());
        assert!(!ForwardError::DashboardUnreachable {
            url: "http://x".into(),
            reason: "status 503".into(),
        }
        .is_delivery_failure());
    }
}
