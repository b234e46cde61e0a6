//! The tailing reader and its lifecycle.

use crate::config::TailConfig;
use crate::error::{CoreError, CoreResult};
use crate::record::LogRecord;
use crate::tailer::scanner::{FrameScanner, ScanStep};
use mlwatch_storage::FileBackend;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Lifecycle state of a [`LogTailer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailStatus {
    /// Created or reset; no session has run.
    Idle,
    /// A session is active.
    Running,
    /// A session ended. Call [`LogTailer::reset`] to run again.
    Stopped,
}

/// Clears the running flag of a [`LogTailer`] from another thread.
///
/// Stopping is observed at the next sleep boundary of a [`Watch`] or
/// [`crate::TailTask`], never in the middle of decoding a frame.
#[derive(Debug, Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the tailer to stop.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Incremental reader over one log file.
///
/// The tailer owns its cursor. Each [`poll`](Self::poll) reopens the file,
/// decodes every complete frame past the cursor and advances the cursor
/// frame by frame. A poll never blocks waiting for bytes.
///
/// # Errors during a poll
///
/// A poll that decoded records before hitting an error returns those
/// records; the cursor is left at the failing frame, so the next poll
/// reports the error without losing anything.
#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
    status: TailStatus,
    stop: Arc<AtomicBool>,
}

impl LogTailer {
    /// Creates a tailer reading `path` from the beginning.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_offset(path, 0)
    }

    /// Creates a tailer resuming from an externally stored offset.
    ///
    /// The offset must be a frame boundary previously reported by
    /// [`offset`](Self::offset).
    pub fn with_offset(path: impl Into<PathBuf>, offset: u64) -> Self {
        Self {
            path: path.into(),
            offset,
            status: TailStatus::Idle,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a tailer from a configuration.
    pub fn from_config(path: impl Into<PathBuf>, config: &TailConfig) -> Self {
        Self::with_offset(path, config.start_offset)
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current cursor.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the lifecycle state.
    pub fn status(&self) -> TailStatus {
        self.status
    }

    /// Returns a handle that can stop this tailer from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: Arc::clone(&self.stop),
        }
    }

    /// Rewinds to offset 0 and returns to `Idle`.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.status = TailStatus::Idle;
        self.stop.store(false, Ordering::SeqCst);
    }

    /// Reads every complete record appended since the last poll.
    ///
    /// A missing file yields no records. A trailing partial frame is left
    /// unread for a later poll.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CorruptLog`] on a bad frame header (terminal)
    /// - [`CoreError::Io`] if the file cannot be read
    /// - [`CoreError::TailerStopped`] if the tailer was stopped
    pub fn poll(&mut self) -> CoreResult<Vec<LogRecord>> {
        self.read_frames(false)
    }

    /// Like [`poll`](Self::poll), for a file no writer will append to again.
    ///
    /// # Errors
    ///
    /// In addition to the `poll` errors, returns [`CoreError::TruncatedLog`]
    /// if the file ends inside a frame.
    pub fn poll_final(&mut self) -> CoreResult<Vec<LogRecord>> {
        self.read_frames(true)
    }

    /// Starts a session, marking the tailer `Running` until the guard drops.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TailerStopped`] if a previous session ended and
    /// the tailer was not reset.
    pub fn session(&mut self) -> CoreResult<TailSession<'_>> {
        self.ensure_not_stopped()?;
        self.status = TailStatus::Running;
        Ok(TailSession { tailer: self })
    }

    /// Follows the file, yielding records as they appear.
    ///
    /// The iterator polls, yields the batch in order, sleeps `poll_interval`
    /// and repeats until stopped through a [`StopHandle`]. A poll error is
    /// yielded once and ends the iteration. The tailer is `Stopped` when the
    /// iterator is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TailerStopped`] if the tailer was stopped.
    pub fn watch(&mut self, poll_interval: Duration) -> CoreResult<Watch<'_>> {
        let stop = self.stop_handle();
        let session = self.session()?;
        Ok(Watch {
            session,
            stop,
            poll_interval,
            pending: VecDeque::new(),
            polled: false,
            finished: false,
        })
    }

    fn ensure_not_stopped(&self) -> CoreResult<()> {
        if self.status == TailStatus::Stopped {
            return Err(CoreError::TailerStopped);
        }
        Ok(())
    }

    fn read_frames(&mut self, closed: bool) -> CoreResult<Vec<LogRecord>> {
        self.ensure_not_stopped()?;

        let Some(backend) = FileBackend::open_existing(&self.path)? else {
            return Ok(Vec::new());
        };

        let mut scanner = FrameScanner::new(&backend, self.offset)?;
        let mut records = Vec::new();

        let outcome = loop {
            match scanner.next_step() {
                Ok(ScanStep::Record(record)) => {
                    self.offset = scanner.offset();
                    records.push(record);
                }
                Ok(ScanStep::End) => break Ok(()),
                Ok(ScanStep::Incomplete {
                    expected,
                    available,
                }) => {
                    if closed {
                        break Err(CoreError::TruncatedLog {
                            offset: self.offset,
                            expected,
                            available,
                        });
                    }
                    break Ok(());
                }
                Err(e) => break Err(e),
            }
        };

        debug!(
            path = %self.path.display(),
            records = records.len(),
            offset = self.offset,
            "polled log"
        );

        match outcome {
            Err(e) if records.is_empty() => Err(e),
            _ => Ok(records),
        }
    }
}

/// Scope guard for a running tailer.
///
/// Dereferences to the [`LogTailer`]; sets it `Stopped` when dropped on any
/// exit path, including `?` and unwinding.
#[derive(Debug)]
pub struct TailSession<'a> {
    tailer: &'a mut LogTailer,
}

impl Deref for TailSession<'_> {
    type Target = LogTailer;

    fn deref(&self) -> &LogTailer {
        self.tailer
    }
}

impl DerefMut for TailSession<'_> {
    fn deref_mut(&mut self) -> &mut LogTailer {
        self.tailer
    }
}

impl Drop for TailSession<'_> {
    fn drop(&mut self) {
        self.tailer.status = TailStatus::Stopped;
    }
}

/// Blocking iterator returned by [`LogTailer::watch`].
#[derive(Debug)]
pub struct Watch<'a> {
    session: TailSession<'a>,
    stop: StopHandle,
    poll_interval: Duration,
    pending: VecDeque<LogRecord>,
    polled: bool,
    finished: bool,
}

impl Watch<'_> {
    /// Returns a handle that ends this watch at its next sleep.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current cursor of the underlying tailer.
    pub fn offset(&self) -> u64 {
        self.session.offset()
    }
}

impl Iterator for Watch<'_> {
    type Item = CoreResult<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }

            if self.polled {
                if self.stop.is_stopped() {
                    self.finished = true;
                    return None;
                }
                std::thread::sleep(self.poll_interval);
                if self.stop.is_stopped() {
                    self.finished = true;
                    return None;
                }
            }
            self.polled = true;

            match self.session.poll() {
                Ok(records) => self.pending.extend(records),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::LogWriter;
    use mlwatch_codec::{encode_frame, HEADER_SIZE};
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;
    use tempfile::tempdir;

    fn write_raw(path: &Path, bytes: &[u8]) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(bytes).unwrap();
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let mut tailer = LogTailer::new(dir.path().join("absent.bin"));
        assert!(tailer.poll().unwrap().is_empty());
        assert_eq!(tailer.offset(), 0);
        assert!(tailer.poll_final().unwrap().is_empty());
    }

    #[test]
    fn hello_world_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        let writer = LogWriter::new(&path);
        writer.append("hello").unwrap();
        writer.append("world").unwrap();

        let mut tailer = LogTailer::new(&path);
        let records = tailer.poll().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "hello");
        assert_eq!(records[1].message, "world");
        assert!(records[0].timestamp <= records[1].timestamp);
    }

    #[test]
    fn second_poll_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        LogWriter::new(&path).append("once").unwrap();

        let mut tailer = LogTailer::new(&path);
        assert_eq!(tailer.poll().unwrap().len(), 1);
        let offset = tailer.offset();
        assert!(tailer.poll().unwrap().is_empty());
        assert_eq!(tailer.offset(), offset);
    }

    #[test]
    fn partial_frame_waits_for_completion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        let frame = encode_frame(7.0, b"complete me").unwrap();

        write_raw(&path, &frame[..HEADER_SIZE + 3]);
        let mut tailer = LogTailer::new(&path);
        assert!(tailer.poll().unwrap().is_empty());
        assert_eq!(tailer.offset(), 0);

        write_raw(&path, &frame[HEADER_SIZE + 3..]);
        let records = tailer.poll().unwrap();
        assert_eq!(records, vec![LogRecord::new(7.0, "complete me")]);
        assert_eq!(tailer.offset(), frame.len() as u64);
    }

    #[test]
    fn poll_final_reports_truncation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        write_raw(&path, &encode_frame(1.0, b"ok").unwrap());
        let torn = encode_frame(2.0, b"torn").unwrap();
        write_raw(&path, &torn[..HEADER_SIZE + 1]);

        let mut tailer = LogTailer::new(&path);
        let records = tailer.poll_final().unwrap();
        assert_eq!(records.len(), 1);

        match tailer.poll_final() {
            Err(CoreError::TruncatedLog {
                offset,
                expected,
                available,
            }) => {
                assert_eq!(offset, (HEADER_SIZE + 2) as u64);
                assert_eq!(expected, (HEADER_SIZE + 4) as u64);
                assert_eq!(available, (HEADER_SIZE + 1) as u64);
            }
            other => panic!("expected TruncatedLog, got {other:?}"),
        }
    }

    #[test]
    fn corruption_surfaces_after_good_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        write_raw(&path, &encode_frame(1.0, b"good").unwrap());
        let mut bad = encode_frame(2.0, b"bad").unwrap();
        bad[4] = 2;
        write_raw(&path, &bad);

        let mut tailer = LogTailer::new(&path);
        assert_eq!(tailer.poll().unwrap().len(), 1);
        let err = tailer.poll().unwrap_err();
        assert!(err.is_corruption());
        // The cursor never moves past a corrupt frame.
        assert_eq!(tailer.offset(), (HEADER_SIZE + 4) as u64);
        assert!(tailer.poll().unwrap_err().is_corruption());
    }

    #[test]
    fn with_offset_resumes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        let writer = LogWriter::new(&path);
        writer.append("old").unwrap();
        let checkpoint = writer.append("new").unwrap();

        let mut tailer =
            LogTailer::from_config(&path, &TailConfig::new().with_start_offset(checkpoint));
        let records = tailer.poll().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "new");
    }

    #[test]
    fn session_sets_stopped_on_drop() {
        let dir = tempdir().unwrap();
        let mut tailer = LogTailer::new(dir.path().join("run.bin"));
        assert_eq!(tailer.status(), TailStatus::Idle);
        {
            let session = tailer.session().unwrap();
            assert_eq!(session.status(), TailStatus::Running);
        }
        assert_eq!(tailer.status(), TailStatus::Stopped);
        assert!(matches!(tailer.session(), Err(CoreError::TailerStopped)));
        assert!(matches!(tailer.poll(), Err(CoreError::TailerStopped)));

        tailer.reset();
        assert_eq!(tailer.status(), TailStatus::Idle);
        assert!(tailer.session().is_ok());
    }

    #[test]
    fn session_stops_on_early_return() {
        fn run(tailer: &mut LogTailer) -> CoreResult<()> {
            let _session = tailer.session()?;
            Err(CoreError::task_failed("bail"))
        }

        let dir = tempdir().unwrap();
        let mut tailer = LogTailer::new(dir.path().join("run.bin"));
        assert!(run(&mut tailer).is_err());
        assert_eq!(tailer.status(), TailStatus::Stopped);
    }

    #[test]
    fn session_stops_on_panic() {
        let dir = tempdir().unwrap();
        let mut tailer = LogTailer::new(dir.path().join("run.bin"));
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _session = tailer.session().unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(tailer.status(), TailStatus::Stopped);
    }

    #[test]
    fn reset_rewinds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        LogWriter::new(&path).append("again").unwrap();

        let mut tailer = LogTailer::new(&path);
        assert_eq!(tailer.poll().unwrap().len(), 1);
        tailer.reset();
        assert_eq!(tailer.offset(), 0);
        assert_eq!(tailer.poll().unwrap().len(), 1);
    }

    #[test]
    fn watch_follows_and_stops() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        let writer = LogWriter::new(&path);
        writer.append("first").unwrap();

        let mut tailer = LogTailer::new(&path);
        let mut watch = tailer.watch(Duration::from_millis(10)).unwrap();
        let stop = watch.stop_handle();

        assert_eq!(watch.next().unwrap().unwrap().message, "first");

        let bg = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            writer.append("second").unwrap();
        });
        assert_eq!(watch.next().unwrap().unwrap().message, "second");
        bg.join().unwrap();

        stop.stop();
        assert!(watch.next().is_none());
        assert!(watch.next().is_none());
        drop(watch);

        assert_eq!(tailer.status(), TailStatus::Stopped);
        assert!(matches!(
            tailer.watch(Duration::from_millis(10)),
            Err(CoreError::TailerStopped)
        ));
    }

    #[test]
    fn watch_yields_error_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");
        write_raw(&path, b"NOTAFRAMEATALL-----");

        let mut tailer = LogTailer::new(&path);
        let mut watch = tailer.watch(Duration::from_millis(1)).unwrap();
        assert!(watch.next().unwrap().unwrap_err().is_corruption());
        assert!(watch.next().is_none());
    }
}
