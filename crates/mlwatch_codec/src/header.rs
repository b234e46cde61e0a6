//! Frame header type.

use crate::error::{CodecError, CodecResult};
use crate::{HEADER_SIZE, MAGIC, VERSION};

/// An unpacked 17-byte frame header.
///
/// Produced by [`crate::decode_header`] without any validation; call
/// [`FrameHeader::validate`] before trusting `length`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    /// Magic bytes as found on disk.
    pub magic: [u8; 4],
    /// Format version as found on disk.
    pub version: u8,
    /// Producer wall-clock time in seconds since the Unix epoch.
    pub timestamp: f64,
    /// Exact payload byte count.
    pub length: u32,
}

impl FrameHeader {
    /// Creates a header for the current format.
    #[must_use]
    pub fn new(timestamp: f64, length: u32) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            timestamp,
            length,
        }
    }

    /// Checks magic and version.
    ///
    /// A mismatch is terminal for the whole stream: frames carry no
    /// boundary marker other than position, so nothing after a bad header
    /// can be located.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CorruptFrame`] on magic or version mismatch.
    pub fn validate(&self) -> CodecResult<()> {
        if self.magic != MAGIC || self.version != VERSION {
            return Err(CodecError::CorruptFrame {
                magic: self.magic,
                version: self.version,
            });
        }
        Ok(())
    }

    /// Payload length as `usize`.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.length as usize
    }

    /// Total frame size on disk: header plus payload.
    #[must_use]
    pub fn frame_len(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.length)
    }
}
