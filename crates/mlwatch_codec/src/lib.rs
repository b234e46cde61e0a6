//! # mlwatch Codec
//!
//! Binary frame encoding/decoding for mlwatch log files.
//!
//! Every record is stored as one self-delimiting frame:
//!
//! ```text
//! | magic (4) | version (1) | timestamp (8, BE f64) | length (4, BE u32) | payload (N) |
//! ```
//!
//! The header is always [`HEADER_SIZE`] = 17 bytes. There is no checksum,
//! index, footer or resynchronization marker: integrity relies entirely on
//! exact byte accounting over an append-only file. A bad magic or version
//! at a frame boundary therefore poisons the rest of the stream.
//!
//! This crate is pure: it never performs I/O.
//!
//! ## Usage
//!
//! ```
//! use mlwatch_codec::{decode_frame, encode_frame, HEADER_SIZE};
//!
//! let bytes = encode_frame(1_700_000_000.25, b"hello").unwrap();
//! assert_eq!(bytes.len(), HEADER_SIZE + 5);
//!
//! let frame = decode_frame(&bytes).unwrap();
//! assert_eq!(frame.timestamp, 1_700_000_000.25);
//! assert_eq!(frame.payload, b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod decoder;
mod encoder;
mod error;
mod header;

pub use decoder::{decode_frame, decode_header, decode_message, FrameRef};
pub use encoder::{encode_frame, encode_header};
pub use error::{CodecError, CodecResult};
pub use header::FrameHeader;

/// Magic bytes opening every frame.
pub const MAGIC: [u8; 4] = *b"MLWG";

/// The only supported frame format version.
pub const VERSION: u8 = 1;

/// Fixed header size: magic (4) + version (1) + timestamp (8) + length (4).
pub const HEADER_SIZE: usize = 17;

/// Largest payload a frame can describe (4-byte length field).
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;
