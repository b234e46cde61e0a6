//! Dump command implementation.

use mlwatch_core::{CoreError, LogRecord, LogTailer};
use serde::Serialize;
use std::path::Path;

/// Record representation for output.
#[derive(Debug, Serialize)]
pub struct DumpedRecord {
    /// Position in the dump, starting at 0.
    pub index: usize,
    /// Producer timestamp (seconds since the Unix epoch).
    pub timestamp: f64,
    /// Message text.
    pub message: String,
}

/// Runs the dump command.
///
/// The file is read as closed: a torn final frame is reported as an error
/// after the records before it are printed.
pub fn run(
    path: &Path,
    limit: Option<usize>,
    start_offset: u64,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("log file not found: {}", path.display()).into());
    }

    let (records, end_offset, failure) = read_records(path, start_offset, limit);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&records)?),
        _ => print_text_output(&records, end_offset),
    }

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn read_records(
    path: &Path,
    start_offset: u64,
    limit: Option<usize>,
) -> (Vec<DumpedRecord>, u64, Option<CoreError>) {
    let mut tailer = LogTailer::with_offset(path, start_offset);
    let max_records = limit.unwrap_or(usize::MAX);
    let mut records: Vec<LogRecord> = Vec::new();
    let mut failure = None;

    while records.len() < max_records {
        match tailer.poll_final() {
            Ok(batch) if batch.is_empty() => break,
            Ok(batch) => records.extend(batch),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    records.truncate(max_records);

    let dumped = records
        .into_iter()
        .enumerate()
        .map(|(index, r)| DumpedRecord {
            index,
            timestamp: r.timestamp,
            message: r.message,
        })
        .collect();
    (dumped, tailer.offset(), failure)
}

fn print_text_output(records: &[DumpedRecord], end_offset: u64) {
    for record in records {
        println!("[{:>6}] {:.6}  {}", record.index, record.timestamp, record.message);
    }
    println!();
    println!("{} records, cursor at byte {}", records.len(), end_offset);
}
