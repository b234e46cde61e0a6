//! # mlwatch Core
//!
//! Producer and consumer sides of the mlwatch log file.
//!
//! This crate provides:
//! - [`LogWriter`] / [`append`] to append framed records to a log file
//! - [`LogTailer`] to incrementally read records as they are appended
//! - [`TailTask`] to run a tailer on a dedicated tokio task
//! - [`EntryQueue`], the drain-on-read buffer between tailing and forwarding
//!
//! ## Tailing model
//!
//! A tailer owns a byte offset that only ever advances to the end of a fully
//! decoded frame. Each poll reopens the file, decodes every complete frame past
//! the offset and stops cleanly at a short header or partial payload, so a
//! frame that is still being written is picked up on a later poll.
//!
//! ```no_run
//! use mlwatch_core::{append, LogTailer};
//!
//! append("logs/train.bin", "epoch 1 done").unwrap();
//!
//! let mut tailer = LogTailer::new("logs/train.bin");
//! for record in tailer.poll().unwrap() {
//!     println!("{} {}", record.timestamp, record.message);
//! }
//! // Nothing new since the last poll.
//! assert!(tailer.poll().unwrap().is_empty());
//! ```
//!
//! ## Limitations
//!
//! Frames carry no checksum and no resynchronization marker. Once a frame
//! boundary holds the wrong magic or version the remainder of the file is
//! unreadable and the tailer reports [`CoreError::CorruptLog`].

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod clock;
mod config;
mod error;
mod queue;
mod record;
mod tailer;
mod writer;

pub use clock::{Clock, MockClock, SystemClock};
pub use config::TailConfig;
pub use error::{CoreError, CoreResult};
pub use queue::EntryQueue;
pub use record::LogRecord;
pub use tailer::{
    FrameScanner, LogTailer, ScanStep, StopHandle, TailHandle, TailSession, TailStatus, TailTask,
    Watch,
};
pub use writer::{append, write_frame, LogWriter};
