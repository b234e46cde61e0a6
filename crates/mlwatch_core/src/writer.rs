//! Append writer.
//!
//! Every append encodes one complete frame and hands it to the storage layer
//! in a single write, so the file grows by exactly one frame per call. A
//! reader racing the write sees either nothing or a prefix of the frame,
//! which it treats as "not yet complete".

use crate::clock::{Clock, SystemClock};
use crate::error::CoreResult;
use mlwatch_codec::encode_frame;
use mlwatch_storage::{FileBackend, StorageBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Appends framed records to a log file.
///
/// The file and its parent directories are created on first append. The
/// writer keeps no handle open between appends.
///
/// Only one process should append to a given file at a time.
#[derive(Debug, Clone)]
pub struct LogWriter {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    sync_on_write: bool,
}

impl LogWriter {
    /// Creates a writer stamping records with the system clock.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Arc::new(SystemClock),
            sync_on_write: false,
        }
    }

    /// Replaces the timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Calls `fsync` after every append when enabled.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `message` stamped with the current time.
    ///
    /// Returns the offset where the frame begins.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Io`] if the directory or file cannot be
    /// created or written. Failures are not retried.
    pub fn append(&self, message: &str) -> CoreResult<u64> {
        self.append_at(self.clock.now(), message)
    }

    /// Appends `message` with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Same as [`LogWriter::append`], plus [`crate::CoreError::Codec`] for a
    /// payload larger than 4 GiB.
    pub fn append_at(&self, timestamp: f64, message: &str) -> CoreResult<u64> {
        let mut backend = FileBackend::open_append(&self.path)?;
        let offset = write_frame(&mut backend, timestamp, message)?;
        if self.sync_on_write {
            backend.sync()?;
        }
        Ok(offset)
    }
}

/// Appends one record to `log_path`, stamped with the system clock.
///
/// # Errors
///
/// Returns [`crate::CoreError::Io`] on any filesystem failure.
pub fn append(log_path: impl AsRef<Path>, message: &str) -> CoreResult<()> {
    LogWriter::new(log_path.as_ref()).append(message)?;
    Ok(())
}

/// Encodes a frame and appends it to `backend` in one write.
///
/// Returns the offset where the frame begins.
///
/// # Errors
///
/// Returns an error if encoding or the backend write fails.
pub fn write_frame(
    backend: &mut dyn StorageBackend,
    timestamp: f64,
    message: &str,
) -> CoreResult<u64> {
    let frame = encode_frame(timestamp, message.as_bytes())?;
    let offset = backend.append(&frame)?;
    trace!(offset, len = frame.len(), "appended frame");
    Ok(offset)
}
