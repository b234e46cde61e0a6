//! Frame encoding.

use crate::error::{CodecError, CodecResult};
use crate::header::FrameHeader;
use crate::{HEADER_SIZE, MAX_PAYLOAD_SIZE};
use bytes::{BufMut, BytesMut};

/// Serializes a header into its 17-byte on-disk form.
///
/// Multi-byte fields are big-endian.
#[must_use]
pub fn encode_header(header: &FrameHeader) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    let mut buf = &mut out[..];
    buf.put_slice(&header.magic);
    buf.put_u8(header.version);
    buf.put_f64(header.timestamp);
    buf.put_u32(header.length);
    out
}

/// Encodes one record as a complete frame.
///
/// The result is exactly `17 + payload.len()` bytes and is meant to be
/// handed to the storage layer in a single append.
///
/// # Errors
///
/// Returns [`CodecError::PayloadTooLarge`] if `payload` exceeds
/// [`MAX_PAYLOAD_SIZE`].
pub fn encode_frame(timestamp: f64, payload: &[u8]) -> CodecResult<Vec<u8>> {
    let length = u32::try_from(payload.len()).map_err(|_| CodecError::PayloadTooLarge {
        len: payload.len(),
        max: MAX_PAYLOAD_SIZE,
    })?;

    let header = FrameHeader::new(timestamp, length);
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(&encode_header(&header));
    buf.put_slice(payload);

    Ok(buf.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAGIC, VERSION};

    #[test]
    fn frame_layout() {
        let bytes = encode_frame(1.0, b"abc").unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 3);
        assert_eq!(&bytes[0..4], &MAGIC);
        assert_eq!(bytes[4], VERSION);
        assert_eq!(&bytes[5..13], &1.0f64.to_be_bytes());
        assert_eq!(&bytes[13..17], &3u32.to_be_bytes());
        assert_eq!(&bytes[17..], b"abc");
    }

    #[test]
    fn known_vector() {
        // Produced by a reference writer: timestamp 0.5, payload "hi".
        let expected: [u8; 19] = [
            b'M', b'L', b'W', b'G', 0x01, 0x3F, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x02, b'h', b'i',
        ];
        assert_eq!(encode_frame(0.5, b"hi").unwrap(), expected);
    }

    #[test]
    fn empty_payload() {
        let bytes = encode_frame(2.0, b"").unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[13..17], &[0, 0, 0, 0]);
    }

    #[test]
    fn header_encoding_preserves_foreign_fields() {
        let header = FrameHeader {
            magic: *b"JUNK",
            version: 7,
            timestamp: -3.25,
            length: 0x0102_0304,
        };
        let bytes = encode_header(&header);
        assert_eq!(&bytes[0..4], b"JUNK");
        assert_eq!(bytes[4], 7);
        assert_eq!(&bytes[13..17], &[1, 2, 3, 4]);
    }
}
