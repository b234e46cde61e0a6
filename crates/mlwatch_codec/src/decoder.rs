//! Frame decoding.

use crate::error::{CodecError, CodecResult};
use crate::header::FrameHeader;
use crate::HEADER_SIZE;
use bytes::Buf;

/// A fully decoded frame borrowing its payload from the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRef<'a> {
    /// Producer timestamp.
    pub timestamp: f64,
    /// Raw payload bytes.
    pub payload: &'a [u8],
}

impl FrameRef<'_> {
    /// Total encoded size of this frame.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Unpacks the first 17 bytes of `bytes` into a header.
///
/// This is a pure unpack: magic and version are returned as found.
/// Extra trailing bytes are ignored.
///
/// # Errors
///
/// Returns [`CodecError::ShortHeader`] if fewer than 17 bytes are supplied.
pub fn decode_header(bytes: &[u8]) -> CodecResult<FrameHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(CodecError::ShortHeader {
            available: bytes.len(),
        });
    }

    let mut buf = &bytes[..HEADER_SIZE];
    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    let version = buf.get_u8();
    let timestamp = buf.get_f64();
    let length = buf.get_u32();

    Ok(FrameHeader {
        magic,
        version,
        timestamp,
        length,
    })
}

/// Decodes one complete frame from the start of `bytes`.
///
/// # Errors
///
/// - [`CodecError::ShortHeader`] if the header is incomplete
/// - [`CodecError::CorruptFrame`] if magic or version is wrong
/// - [`CodecError::PartialFrame`] if the payload is incomplete
pub fn decode_frame(bytes: &[u8]) -> CodecResult<FrameRef<'_>> {
    let header = decode_header(bytes)?;
    header.validate()?;

    let body = &bytes[HEADER_SIZE..];
    let len = header.payload_len();
    if body.len() < len {
        return Err(CodecError::PartialFrame {
            expected: len,
            available: body.len(),
        });
    }

    Ok(FrameRef {
        timestamp: header.timestamp,
        payload: &body[..len],
    })
}

/// Decodes a payload as text, replacing malformed UTF-8 with U+FFFD.
///
/// Never fails: a producer writing bad bytes must not halt the stream.
#[must_use]
pub fn decode_message(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}
