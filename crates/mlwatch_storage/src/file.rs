//! File-based storage backend for the on-disk log.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// Two access modes exist:
///
/// - [`FileBackend::open_append`] opens (creating if needed) the file in
///   append mode for the single producer
/// - [`FileBackend::open_existing`] opens an existing file read-only for
///   tailing; the size is snapshotted at open time
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use mlwatch_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open_append(Path::new("logs/run.bin")).unwrap();
/// let offset = backend.append(b"framed bytes").unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: RwLock<File>,
    size: RwLock<u64>,
    writable: bool,
}

impl FileBackend {
    /// Opens or creates the file in append mode, creating parent directories.
    ///
    /// Directory creation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be opened.
    pub fn open_append(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
            writable: true,
        })
    }

    /// Opens an existing file read-only.
    ///
    /// Returns `Ok(None)` when the file does not exist yet; a producer that
    /// has not started is not an error for readers.
    ///
    /// # Errors
    ///
    /// Returns an error for any I/O failure other than a missing file.
    pub fn open_existing(path: &Path) -> StorageResult<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let size = file.metadata()?.len();

        Ok(Some(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
            writable: false,
        }))
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if this backend was opened for appending.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = *self.size.read();
        match offset.checked_add(len as u64) {
            Some(end) if end <= size => {}
            _ => return Err(StorageError::ReadPastEnd { offset, len, size }),
        }
        if len == 0 {
            return Ok(Vec::new());
        }

        // Seek and read must not interleave with another reader.
        let mut file = self.file.write();
        file.seek(SeekFrom::Start(offset))?;
        let mut chunk = vec![0u8; len];
        file.read_exact(&mut chunk)?;
        Ok(chunk)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        if !self.writable {
            return Err(StorageError::ReadOnly {
                path: self.path.display().to_string(),
            });
        }

        let mut file = self.file.write();
        let mut size = self.size.write();

        // Another handle may have appended since open.
        let offset = file.metadata()?.len();
        if data.is_empty() {
            *size = offset;
            return Ok(offset);
        }

        file.write_all(data)?;
        *size = offset + data.len() as u64;

        Ok(offset)
    }

    fn flush(&mut self) -> StorageResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }

    fn sync(&mut self) -> StorageResult<()> {
        let file = self.file.write();
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_path(dir: &TempDir) -> PathBuf {
        dir.path().join("train.bin")
    }

    #[test]
    fn open_append_creates_empty_log() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);

        let log = FileBackend::open_append(&path).unwrap();
        assert!(path.exists());
        assert!(log.is_writable());
        assert_eq!(log.size().unwrap(), 0);
        assert_eq!(log.path(), path);
    }

    #[test]
    fn open_append_creates_missing_parents_idempotently() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runs").join("42").join("train.bin");

        FileBackend::open_append(&path).unwrap();
        let again = FileBackend::open_append(&path).unwrap();
        assert_eq!(again.size().unwrap(), 0);
    }

    #[test]
    fn appends_report_their_start_offset() {
        let dir = TempDir::new().unwrap();
        let mut log = FileBackend::open_append(&log_path(&dir)).unwrap();

        assert_eq!(log.append(b"MLWG").unwrap(), 0);
        assert_eq!(log.append(b"-frame-").unwrap(), 4);
        assert_eq!(log.size().unwrap(), 11);
        assert_eq!(log.read_at(4, 7).unwrap(), b"-frame-");
    }

    #[test]
    fn reopening_for_append_keeps_prior_bytes() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);

        let mut first = FileBackend::open_append(&path).unwrap();
        first.append(b"epoch-1").unwrap();
        first.sync().unwrap();
        drop(first);

        let mut second = FileBackend::open_append(&path).unwrap();
        assert_eq!(second.append(b"epoch-2").unwrap(), 7);
        second.flush().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"epoch-1epoch-2");
    }

    #[test]
    fn append_offset_tracks_other_writers() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);

        let mut a = FileBackend::open_append(&path).unwrap();
        let mut b = FileBackend::open_append(&path).unwrap();
        a.append(b"aaaa").unwrap();
        assert_eq!(b.append(b"bb").unwrap(), 4);
    }

    #[test]
    fn reads_beyond_snapshot_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut log = FileBackend::open_append(&log_path(&dir)).unwrap();
        log.append(b"12345").unwrap();

        assert!(matches!(
            log.read_at(3, 5),
            Err(StorageError::ReadPastEnd { offset: 3, len: 5, size: 5 })
        ));
        assert!(matches!(
            log.read_at(u64::MAX, 1),
            Err(StorageError::ReadPastEnd { .. })
        ));
        assert!(log.read_at(5, 0).unwrap().is_empty());
    }

    #[test]
    fn open_existing_on_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);

        assert!(FileBackend::open_existing(&path).unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn open_existing_sees_only_bytes_present_at_open() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        std::fs::write(&path, b"abc").unwrap();

        let reader = FileBackend::open_existing(&path).unwrap().unwrap();
        FileBackend::open_append(&path)
            .unwrap()
            .append(b"def")
            .unwrap();

        assert_eq!(reader.size().unwrap(), 3);
        assert_eq!(reader.read_at(0, 3).unwrap(), b"abc");
        assert!(reader.read_at(3, 1).is_err());
    }

    #[test]
    fn open_existing_is_read_only() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        std::fs::write(&path, b"abc").unwrap();

        let mut reader = FileBackend::open_existing(&path).unwrap().unwrap();
        assert!(!reader.is_writable());
        assert!(matches!(
            reader.append(b"x"),
            Err(StorageError::ReadOnly { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }
}
