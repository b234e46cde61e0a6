//! Frame-by-frame scanning over a storage backend.

use crate::error::{CoreError, CoreResult};
use crate::record::LogRecord;
use mlwatch_codec::{decode_header, decode_message, HEADER_SIZE};
use mlwatch_storage::StorageBackend;

/// Outcome of one scanning step.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStep {
    /// A complete frame was decoded and the cursor moved past it.
    Record(LogRecord),
    /// The cursor sits exactly at the end of the data.
    End,
    /// Bytes remain past the cursor but do not yet form a complete frame.
    ///
    /// For a live file this means a write is in progress; for a closed file
    /// it means the log was truncated.
    Incomplete {
        /// Bytes needed from the cursor to finish the frame.
        expected: u64,
        /// Bytes present from the cursor.
        available: u64,
    },
}

/// Walks frames from a starting offset up to the size observed at creation.
///
/// The size is snapshotted once, so bytes appended while scanning are left
/// for the next scanner. The cursor only advances past fully decoded frames;
/// after `Incomplete` or an error it stays at the start of the offending
/// frame.
pub struct FrameScanner<'a> {
    backend: &'a dyn StorageBackend,
    size: u64,
    offset: u64,
}

impl<'a> FrameScanner<'a> {
    /// Creates a scanner starting at `start_offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend size cannot be determined.
    pub fn new(backend: &'a dyn StorageBackend, start_offset: u64) -> CoreResult<Self> {
        let size = backend.size()?;
        Ok(Self {
            backend,
            size,
            offset: start_offset,
        })
    }

    /// Current cursor: the end of the last decoded frame.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Data size snapshotted at creation.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Decodes the frame at the cursor.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CorruptLog`] if the header has the wrong magic or version
    /// - [`CoreError::Io`] if the backend read fails
    pub fn next_step(&mut self) -> CoreResult<ScanStep> {
        let available = self.size.saturating_sub(self.offset);
        if available == 0 {
            return Ok(ScanStep::End);
        }
        if available < HEADER_SIZE as u64 {
            return Ok(ScanStep::Incomplete {
                expected: HEADER_SIZE as u64,
                available,
            });
        }

        let header_bytes = self.backend.read_at(self.offset, HEADER_SIZE)?;
        let header = decode_header(&header_bytes)?;
        header
            .validate()
            .map_err(|e| CoreError::corrupt_log(self.offset, e))?;

        let expected = header.frame_len();
        if available < expected {
            return Ok(ScanStep::Incomplete {
                expected,
                available,
            });
        }

        let payload = self
            .backend
            .read_at(self.offset + HEADER_SIZE as u64, header.payload_len())?;
        self.offset += expected;

        Ok(ScanStep::Record(LogRecord {
            timestamp: header.timestamp,
            message: decode_message(&payload),
        }))
    }
}

impl Iterator for FrameScanner<'_> {
    type Item = CoreResult<LogRecord>;

    /// Yields complete frames, ending quietly at end of data or at a
    /// partial frame.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_step() {
            Ok(ScanStep::Record(record)) => Some(Ok(record)),
            Ok(ScanStep::End | ScanStep::Incomplete { .. }) => None,
            Err(e) => {
                // Park the cursor so the error is not repeated forever.
                self.size = self.offset;
                Some(Err(e))
            }
        }
    }
}
