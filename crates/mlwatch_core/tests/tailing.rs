//! End-to-end tailing tests against real files.

use mlwatch_codec::encode_frame;
use mlwatch_core::{append, CoreError, LogRecord, LogTailer, LogWriter, MockClock};
use proptest::prelude::*;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
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
fn writer_and_tailer_agree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("train.bin");
    let clock = Arc::new(MockClock::with_time(1_700_000_000.0));
    let writer = LogWriter::new(&path).with_clock(clock.clone());

    let mut tailer = LogTailer::new(&path);
    assert!(tailer.poll().unwrap().is_empty());

    writer.append("epoch 1").unwrap();
    clock.advance(std::time::Duration::from_secs(1));
    writer.append("epoch 2").unwrap();

    assert_eq!(
        tailer.poll().unwrap(),
        vec![
            LogRecord::new(1_700_000_000.0, "epoch 1"),
            LogRecord::new(1_700_000_001.0, "epoch 2"),
        ]
    );

    append(&path, "epoch 3").unwrap();
    let records = tailer.poll().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "epoch 3");
}

#[test]
fn foreign_file_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not-a-log.txt");
    std::fs::write(&path, "just some text that is longer than a header").unwrap();

    let mut tailer = LogTailer::new(&path);
    match tailer.poll() {
        Err(CoreError::CorruptLog { offset, .. }) => assert_eq!(offset, 0),
        other => panic!("expected CorruptLog, got {other:?}"),
    }
}

#[test]
fn empty_message_roundtrips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.bin");
    append(&path, "").unwrap();
    append(&path, "after").unwrap();

    let records = LogTailer::new(&path).poll().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message, "");
    assert_eq!(records[1].message, "after");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// However the byte stream is split into appends, and whenever polls
    /// happen in between, every record is seen exactly once and in order.
    #[test]
    fn no_loss_no_duplication(
        messages in proptest::collection::vec("[a-z0-9 ]{0,24}", 1..12),
        cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.bin");

        let mut stream = Vec::new();
        for (i, m) in messages.iter().enumerate() {
            stream.extend(encode_frame(i as f64, m.as_bytes()).unwrap());
        }

        let mut points: Vec<usize> = cuts.iter().map(|c| c.index(stream.len())).collect();
        points.push(stream.len());
        points.sort_unstable();
        points.dedup();

        let mut tailer = LogTailer::new(&path);
        let mut seen = Vec::new();
        let mut written = 0;
        for point in points {
            write_raw(&path, &stream[written..point]);
            written = point;
            seen.extend(tailer.poll().unwrap());
        }
        seen.extend(tailer.poll().unwrap());

        let got: Vec<_> = seen.iter().map(|r| r.message.clone()).collect();
        prop_assert_eq!(got, messages);
        prop_assert_eq!(tailer.offset(), stream.len() as u64);
    }
}
