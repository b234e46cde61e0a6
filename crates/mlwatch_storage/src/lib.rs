//! # mlwatch Storage
//!
//! Byte store backends for mlwatch log files.
//!
//! Storage backends are **opaque byte stores** - they do not interpret
//! the data they store. Frame layout, headers and record decoding all
//! live in `mlwatch_codec` and `mlwatch_core`.
//!
//! ## Design Principles
//!
//! - Backends are simple byte stores (read, append, flush)
//! - Appends are whole-buffer writes; callers hand over complete frames
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing, including torn-write simulation
//! - [`FileBackend`] - For the on-disk log using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use mlwatch_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"hello world").unwrap();
//! let data = backend.read_at(offset, 11).unwrap();
//! assert_eq!(&data, b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
