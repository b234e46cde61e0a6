//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;

/// A log image held in memory.
///
/// Frame scanning tests use it to fabricate logs byte-by-byte (torn
/// frames, corrupted headers) without touching the filesystem.
///
/// # Example
///
/// ```rust
/// use mlwatch_storage::{StorageBackend, InMemoryBackend};
///
/// let mut log = InMemoryBackend::new();
/// assert_eq!(log.append(b"MLWG").unwrap(), 0);
/// assert_eq!(log.append(b"rest").unwrap(), 4);
/// assert_eq!(log.size().unwrap(), 8);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    bytes: RwLock<Vec<u8>>,
}

impl InMemoryBackend {
    /// Creates an empty log image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing byte image.
    #[must_use]
    pub fn with_data(bytes: Vec<u8>) -> Self {
        Self {
            bytes: RwLock::new(bytes),
        }
    }

    /// Returns a snapshot of the image.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.bytes.read().to_vec()
    }

    /// Overwrites a single byte in place, simulating on-disk corruption.
    ///
    /// # Errors
    ///
    /// Returns `ReadPastEnd` if `offset` is outside the image.
    pub fn patch_byte(&self, offset: u64, value: u8) -> StorageResult<()> {
        let mut bytes = self.bytes.write();
        let size = bytes.len() as u64;
        let slot = usize::try_from(offset)
            .ok()
            .and_then(|i| bytes.get_mut(i))
            .ok_or(StorageError::ReadPastEnd {
                offset,
                len: 1,
                size,
            })?;
        *slot = value;
        Ok(())
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let bytes = self.bytes.read();
        usize::try_from(offset)
            .ok()
            .and_then(|start| bytes.get(start..start.checked_add(len)?))
            .map(<[u8]>::to_vec)
            .ok_or(StorageError::ReadPastEnd {
                offset,
                len,
                size: bytes.len() as u64,
            })
    }

    fn append(&mut self, chunk: &[u8]) -> StorageResult<u64> {
        let mut bytes = self.bytes.write();
        let start = bytes.len() as u64;
        bytes.extend_from_slice(chunk);
        Ok(start)
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.bytes.read().len() as u64)
    }

    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_image_is_empty() {
        let log = InMemoryBackend::new();
        assert_eq!(log.size().unwrap(), 0);
        assert!(log.read_at(0, 0).unwrap().is_empty());
    }

    #[test]
    fn appends_are_contiguous() {
        let mut log = InMemoryBackend::new();
        let header = log.append(&[0xAB; 17]).unwrap();
        let payload = log.append(b"loss=0.25").unwrap();

        assert_eq!((header, payload), (0, 17));
        assert_eq!(log.read_at(17, 9).unwrap(), b"loss=0.25");
        assert_eq!(log.data().len(), 26);
    }

    #[test]
    fn reads_never_cross_the_end() {
        let log = InMemoryBackend::with_data(b"epoch".to_vec());

        assert_eq!(log.read_at(5, 0).unwrap(), b"");
        assert!(matches!(
            log.read_at(2, 4),
            Err(StorageError::ReadPastEnd { offset: 2, len: 4, size: 5 })
        ));
        assert!(log.read_at(6, 0).is_err());
        assert!(log.read_at(1, usize::MAX).is_err());
    }

    #[test]
    fn patch_byte_corrupts_in_place() {
        let log = InMemoryBackend::with_data(b"MLWG".to_vec());
        log.patch_byte(3, b'X').unwrap();

        assert_eq!(log.data(), b"MLWX");
        assert!(matches!(
            log.patch_byte(4, 0),
            Err(StorageError::ReadPastEnd { size: 4, .. })
        ));
    }
}
