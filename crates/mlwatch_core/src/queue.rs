//! Shared entry buffer between the tail task and its consumer.

use crate::record::LogRecord;
use parking_lot::Mutex;
use std::mem;

/// A thread-safe buffer of decoded records with drain-on-read semantics.
///
/// Every read is a drain: the contents are swapped for an empty vector under
/// a single lock acquisition, so a record is handed to exactly one drainer.
/// Give each queue exactly one consumer.
#[derive(Debug, Default)]
pub struct EntryQueue {
    entries: Mutex<Vec<LogRecord>>,
}

impl EntryQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record.
    pub fn push(&self, record: LogRecord) {
        self.entries.lock().push(record);
    }

    /// Appends records in order.
    pub fn push_many(&self, records: impl IntoIterator<Item = LogRecord>) {
        self.entries.lock().extend(records);
    }

    /// Takes everything queued so far, leaving the queue empty.
    pub fn drain(&self) -> Vec<LogRecord> {
        mem::take(&mut *self.entries.lock())
    }

    /// Copies the current contents without draining.
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.entries.lock().clone()
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn drain_empties_queue() {
        let queue = EntryQueue::new();
        queue.push(LogRecord::new(1.0, "a"));
        queue.push_many([LogRecord::new(2.0, "b"), LogRecord::new(3.0, "c")]);
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert_eq!(
            drained.iter().map(|r| r.message.as_str()).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn snapshot_does_not_drain() {
        let queue = EntryQueue::new();
        queue.push(LogRecord::new(1.0, "a"));
        assert_eq!(queue.snapshot().len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn concurrent_push_and_drain_loses_nothing() {
        let queue = Arc::new(EntryQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..250 {
                        queue.push(LogRecord::new(f64::from(i), format!("{p}-{i}")));
                    }
                })
            })
            .collect();

        let mut seen = Vec::new();
        for _ in 0..100 {
            seen.extend(queue.drain());
        }
        for handle in producers {
            handle.join().unwrap();
        }
        seen.extend(queue.drain());

        assert_eq!(seen.len(), 1000);
        seen.sort_by(|a, b| a.message.cmp(&b.message));
        seen.dedup_by(|a, b| a.message == b.message);
        assert_eq!(seen.len(), 1000);
    }
}
