//! Verify command implementation.

use mlwatch_core::{CoreError, FrameScanner, ScanStep};
use mlwatch_storage::FileBackend;
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of complete frames.
    pub frames: usize,
    /// Bytes covered by complete frames.
    pub valid_bytes: u64,
    /// File size.
    pub total_bytes: u64,
    /// First problem found, if any.
    pub error: Option<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying log at {:?}", path);
    println!();

    let result = verify_log(path)?;

    println!("  Frames:      {}", result.frames);
    println!("  Valid bytes: {} of {}", result.valid_bytes, result.total_bytes);
    if let Some(error) = &result.error {
        println!("    ERROR: {}", error);
    }

    println!();
    if result.is_ok() {
        println!("✓ Log verification passed");
        Ok(())
    } else {
        println!("✗ Log verification failed");
        Err("Verification failed".into())
    }
}

fn verify_log(path: &Path) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let backend = FileBackend::open_existing(path)?
        .ok_or_else(|| format!("log file not found: {}", path.display()))?;
    let mut scanner = FrameScanner::new(&backend, 0)?;

    let mut result = VerifyResult {
        frames: 0,
        valid_bytes: 0,
        total_bytes: scanner.size(),
        error: None,
    };

    loop {
        match scanner.next_step() {
            Ok(ScanStep::Record(_)) => result.frames += 1,
            Ok(ScanStep::End) => break,
            Ok(ScanStep::Incomplete {
                expected,
                available,
            }) => {
                let err = CoreError::TruncatedLog {
                    offset: scanner.offset(),
                    expected,
                    available,
                };
                result.error = Some(err.to_string());
                break;
            }
            Err(e) => {
                result.error = Some(e.to_string());
                break;
            }
        }
    }
    result.valid_bytes = scanner.offset();

    Ok(result)
}
