//! Error types for mlwatch core.

use mlwatch_codec::CodecError;
use mlwatch_storage::StorageError;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while writing or tailing a log.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Filesystem failure while creating, opening, reading or writing a log.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage backend error other than plain I/O.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Frame codec error outside of tailing (e.g. oversized payload).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A frame boundary holds the wrong magic or version.
    ///
    /// Terminal: the file cannot be read past `offset`.
    #[error("corrupt log at offset {offset}: {source}")]
    CorruptLog {
        /// Offset of the frame that failed validation.
        offset: u64,
        /// The underlying codec failure.
        #[source]
        source: CodecError,
    },

    /// A closed log ends in the middle of a frame.
    #[error("truncated log at offset {offset}: expected {expected} bytes, {available} available")]
    TruncatedLog {
        /// Offset of the incomplete frame.
        offset: u64,
        /// Bytes required to complete the frame (header included).
        expected: u64,
        /// Bytes actually present past `offset`.
        available: u64,
    },

    /// The tailer was stopped and must be reset before it can run again.
    #[error("tailer is stopped; call reset() before restarting")]
    TailerStopped,

    /// A background task panicked or was cancelled.
    #[error("task failed: {message}")]
    TaskFailed {
        /// Description of the failure.
        message: String,
    },
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => Self::Io(e),
            other => Self::Storage(other),
        }
    }
}

impl CoreError {
    /// Creates a corrupt-log error for the frame at `offset`.
    pub fn corrupt_log(offset: u64, source: CodecError) -> Self {
        Self::CorruptLog { offset, source }
    }

    /// Creates a task failure error.
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }

    /// Returns true if the log cannot be read any further.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptLog { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_io_becomes_io() {
        let err: CoreError = StorageError::Io(io::Error::other("disk")).into();
        assert!(matches!(err, CoreError::Io(_)));

        let err: CoreError = StorageError::ReadOnly {
            path: "x".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[test]
    fn corrupt_log_display() {
        let err = CoreError::corrupt_log(
            34,
            CodecError::CorruptFrame {
                magic: *b"JUNK",
                version: 1,
            },
        );
        assert!(err.is_corruption());
        assert!(err.to_string().starts_with("corrupt log at offset 34"));
    }

    #[test]
    fn truncated_display() {
        let err = CoreError::TruncatedLog {
            offset: 17,
            expected: 22,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "truncated log at offset 17: expected 22 bytes, 20 available"
        );
        assert!(!err.is_corruption());
    }
}
