//! Log command implementation.

use mlwatch_core::LogWriter;
use std::path::Path;

/// Appends one record per message.
pub fn run(path: &Path, messages: &[String], sync: bool) -> Result<(), Box<dyn std::error::Error>> {
    let writer = LogWriter::new(path).sync_on_write(sync);
    for message in messages {
        let offset = writer.append(message)?;
        tracing::debug!(offset, "appended record");
    }
    Ok(())
}
