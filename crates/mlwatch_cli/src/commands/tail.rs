//! Tail command implementation.

use super::signal::shutdown_signal;
use mlwatch_core::{CoreResult, LogTailer};
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinError;

/// Follows the log, printing records until interrupted.
pub async fn run(path: &Path, interval: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut tailer = LogTailer::new(path);
    let stop = tailer.stop_handle();

    let mut follower = tokio::task::spawn_blocking(move || -> CoreResult<u64> {
        let mut watch = tailer.watch(interval)?;
        for record in &mut watch {
            let record = record?;
            println!("{:.6}  {}", record.timestamp, record.message);
        }
        Ok(watch.offset())
    });

    tokio::select! {
        joined = &mut follower => return finish(joined),
        result = shutdown_signal() => result?,
    }

    // Observed at the next sleep boundary.
    stop.stop();
    finish(follower.await)
}

fn finish(joined: Result<CoreResult<u64>, JoinError>) -> Result<(), Box<dyn std::error::Error>> {
    let offset = joined??;
    tracing::info!(offset, "tail stopped");
    Ok(())
}
