//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during frame encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer than 17 bytes were supplied where a header was expected.
    #[error("short header: need 17 bytes, got {available}")]
    ShortHeader {
        /// Number of bytes available.
        available: usize,
    },

    /// The header is valid but the payload is not fully present.
    #[error("partial frame: payload needs {expected} bytes, got {available}")]
    PartialFrame {
        /// Payload length announced by the header.
        expected: usize,
        /// Payload bytes actually available.
        available: usize,
    },

    /// Magic or version mismatch at a frame boundary.
    #[error("corrupt frame: magic {magic:02x?}, version {version}")]
    CorruptFrame {
        /// Magic bytes found.
        magic: [u8; 4],
        /// Version byte found.
        version: u8,
    },

    /// Payload does not fit the 32-bit length field.
    #[error("payload too large: {len} bytes exceeds maximum of {max} bytes")]
    PayloadTooLarge {
        /// Payload length in bytes.
        len: usize,
        /// Maximum encodable length.
        max: usize,
    },
}

impl CodecError {
    /// Returns true if the error leaves the stream unreadable.
    ///
    /// Short headers and partial frames only mean more bytes are needed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CorruptFrame { .. })
    }

    /// Returns true if more bytes could turn this into a successful decode.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::ShortHeader { .. } | Self::PartialFrame { .. })
    }
}
