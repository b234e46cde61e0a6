//! Collector-side record store.

use mlwatch_core::LogRecord;
use parking_lot::RwLock;

/// Every record the collector has accepted, in arrival order.
///
/// Reads do not drain: any number of viewers see the full history.
#[derive(Debug, Default)]
pub struct LogStore {
    entries: RwLock<Vec<LogRecord>>,
}

impl LogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a posted batch, flattened into individual records.
    pub fn append(&self, batch: Vec<LogRecord>) {
        self.entries.write().extend(batch);
    }

    /// Returns a copy of all stored records.
    pub fn all(&self) -> Vec<LogRecord> {
        self.entries.read().clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
