//! The decoded log record.

use serde::{Deserialize, Serialize};

/// One decoded log entry.
///
/// Records exist only in memory and on the wire; on disk they are frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Producer wall-clock time in seconds since the Unix epoch.
    pub timestamp: f64,
    /// Payload text, lossily decoded from UTF-8.
    pub message: String,
}

impl LogRecord {
    /// Creates a record.
    pub fn new(timestamp: f64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }
}
