//! Running a tailer on a dedicated tokio task.

use crate::config::TailConfig;
use crate::error::{CoreError, CoreResult};
use crate::queue::EntryQueue;
use crate::tailer::reader::LogTailer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Spawns tailers onto the tokio runtime.
///
/// The tailer is moved into the task, so nothing else can touch its cursor
/// while it runs. Each poll's records are pushed into the shared queue.
pub struct TailTask;

impl TailTask {
    /// Starts tailing on a new task.
    ///
    /// The task polls immediately, then every `config.poll_interval`, until
    /// [`TailHandle::stop`] is called or a poll fails. A corrupt log ends the
    /// task; the error is returned from `stop`.
    pub fn spawn(tailer: LogTailer, config: &TailConfig, queue: Arc<EntryQueue>) -> TailHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let interval = config.poll_interval;
        let join = tokio::spawn(run(tailer, interval, queue, stop_rx));
        TailHandle { stop_tx, join }
    }
}

async fn run(
    mut tailer: LogTailer,
    interval: Duration,
    queue: Arc<EntryQueue>,
    mut stop_rx: watch::Receiver<bool>,
) -> CoreResult<LogTailer> {
    {
        let mut session = tailer.session()?;
        info!(path = %session.path().display(), offset = session.offset(), "tail task started");

        loop {
            match session.poll() {
                Ok(records) => {
                    if !records.is_empty() {
                        debug!(count = records.len(), "queued records");
                        queue.push_many(records);
                    }
                }
                Err(e) => {
                    error!(path = %session.path().display(), error = %e, "tail task failed");
                    return Err(e);
                }
            }

            if *stop_rx.borrow() {
                break;
            }
            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                // A dropped handle also ends the task.
                _ = stop_rx.changed() => break,
            }
        }
    }

    info!(path = %tailer.path().display(), offset = tailer.offset(), "tail task stopped");
    Ok(tailer)
}

/// Handle to a running tail task.
#[derive(Debug)]
pub struct TailHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<CoreResult<LogTailer>>,
}

impl TailHandle {
    /// Returns true if the task has exited, normally or on error.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signals the task and waits for it to exit.
    ///
    /// Returns the tailer in its final state (`Stopped`, cursor after the
    /// last queued record).
    ///
    /// # Errors
    ///
    /// Returns the error that ended the task, or [`CoreError::TaskFailed`] if
    /// it panicked.
    pub async fn stop(self) -> CoreResult<LogTailer> {
        // The task may already have exited on its own.
        let _ = self.stop_tx.send(true);
        self.join
            .await
            .map_err(|e| CoreError::task_failed(e.to_string()))?
    }
}
