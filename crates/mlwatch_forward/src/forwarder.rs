//! The periodic drain-and-deliver loop.

use crate::config::ForwarderConfig;
use crate::error::{ForwardError, ForwardResult};
use crate::sink::Sink;
use mlwatch_core::EntryQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Counters for a forwarder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderStats {
    /// Batches accepted by the sink.
    pub batches_delivered: u64,
    /// Records in accepted batches.
    pub records_delivered: u64,
    /// Batches the sink rejected and that were dropped.
    pub batches_dropped: u64,
    /// Records in dropped batches.
    pub records_dropped: u64,
}

/// Spawns the forwarding loop.
pub struct Forwarder;

impl Forwarder {
    /// Starts a task that drains `queue` into `sink` every `config.interval`.
    ///
    /// The stop signal is observed at the interval sleep; on stop the task
    /// drains and delivers once more before exiting.
    pub fn spawn(
        config: &ForwarderConfig,
        queue: Arc<EntryQueue>,
        sink: Arc<dyn Sink>,
    ) -> ForwarderHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(run(config.interval, queue, sink, stop_rx));
        ForwarderHandle { stop_tx, join }
    }

    /// Drains `queue` once and delivers the batch if it is non-empty.
    ///
    /// Delivery failures are logged and the batch is dropped; they never
    /// propagate.
    pub async fn forward_once(queue: &EntryQueue, sink: &dyn Sink, stats: &mut ForwarderStats) {
        let batch = queue.drain();
        if batch.is_empty() {
            return;
        }

        let count = batch.len() as u64;
        match sink.deliver(batch).await {
            Ok(()) => {
                debug!(sink = sink.name(), count, "delivered batch");
                stats.batches_delivered += 1;
                stats.records_delivered += count;
            }
            Err(e) => {
                warn!(sink = sink.name(), count, error = %e, "dropping batch");
                stats.batches_dropped += 1;
                stats.records_dropped += count;
            }
        }
    }
}

async fn run(
    interval: Duration,
    queue: Arc<EntryQueue>,
    sink: Arc<dyn Sink>,
    mut stop_rx: watch::Receiver<bool>,
) -> ForwarderStats {
    info!(sink = sink.name(), interval_ms = interval.as_millis() as u64, "forwarder started");
    let mut stats = ForwarderStats::default();

    loop {
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            _ = stop_rx.changed() => break,
        }
        Forwarder::forward_once(&queue, sink.as_ref(), &mut stats).await;
    }

    Forwarder::forward_once(&queue, sink.as_ref(), &mut stats).await;
    info!(
        sink = sink.name(),
        delivered = stats.records_delivered,
        dropped = stats.records_dropped,
        "forwarder stopped"
    );
    stats
}

/// Handle to a running forwarder.
#[derive(Debug)]
pub struct ForwarderHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<ForwarderStats>,
}

impl ForwarderHandle {
    /// Signals the forwarder, waits for its final delivery and returns its
    /// counters.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::TaskFailed`] if the task panicked.
    pub async fn stop(self) -> ForwardResult<ForwarderStats> {
        let _ = self.stop_tx.send(true);
        self.join
            .await
            .map_err(|e| ForwardError::TaskFailed(e.to_string()))
    }
}
