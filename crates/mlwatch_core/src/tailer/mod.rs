//! Resumable tailing of a growing log file.
//!
//! - [`FrameScanner`] walks complete frames over any storage backend
//! - [`LogTailer`] keeps the cursor across polls of a file path
//! - [`TailTask`] runs a tailer on its own tokio task, feeding an
//!   [`crate::EntryQueue`]

mod reader;
mod scanner;
mod task;

pub use reader::{LogTailer, StopHandle, TailSession, TailStatus, Watch};
pub use scanner::{FrameScanner, ScanStep};
pub use task::{TailHandle, TailTask};
