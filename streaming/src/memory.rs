//! In-memory storage backend
//!
//! Serves files from owned byte vectors. Used by tests and by hosts that
//! ship their assets embedded in the binary.

use crate::driver::Storage;
use crate::error::StorageError;
use alloc::string::String;
use alloc::vec::Vec;

struct MemoryFile {
    path: String,
    bytes: Vec<u8>,
}

/// Open file: index into the file table plus a read cursor
#[derive(Debug)]
pub struct MemoryHandle {
    file: usize,
    cursor: usize,
}

/// A flat table of named byte blobs
#[derive(Default)]
pub struct MemoryStorage {
    files: Vec<MemoryFile>,
    max_read: Option<usize>,
    open_handles: usize,
}

impl MemoryStorage {
    /// Empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Cap every read at `max` bytes to simulate a slow device
    pub fn with_max_read(mut self, max: usize) -> Self {
        self.max_read = Some(max);
        self
    }

    /// Add a file, replacing any existing one at the same path
    pub fn insert(&mut self, path: &str, bytes: &[u8]) {
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(file) => file.bytes = bytes.to_vec(),
            None => self.files.push(MemoryFile {
                path: String::from(path),
                bytes: bytes.to_vec(),
            }),
        }
    }

    /// Handles opened and not yet closed
    pub fn open_handles(&self) -> usize {
        self.open_handles
    }

    fn find(&self, path: &str) -> Result<usize, StorageError> {
        self.files
            .iter()
            .position(|f| f.path == path)
            .ok_or(StorageError::NotFound)
    }
}

impl Storage for MemoryStorage {
    type Handle = MemoryHandle;

    fn stat(&mut self, path: &str) -> Result<usize, StorageError> {
        let idx = self.find(path)?;
        Ok(self.files[idx].bytes.len())
    }

    fn open(&mut self, path: &str) -> Result<MemoryHandle, StorageError> {
        let file = self.find(path)?;
        self.open_handles += 1;
        Ok(MemoryHandle { file, cursor: 0 })
    }

    fn read(&mut self, handle: &mut MemoryHandle, dst: &mut [u8]) -> Result<usize, StorageError> {
        let file = self.files.get(handle.file).ok_or(StorageError::Io)?;
        let rest = file.bytes.get(handle.cursor..).unwrap_or_default();
        let mut n = dst.len().min(rest.len());
        if let Some(max) = self.max_read {
            n = n.min(max);
        }
        dst[..n].copy_from_slice(&rest[..n]);
        handle.cursor += n;
        Ok(n)
    }

    fn close(&mut self, _handle: MemoryHandle) -> Result<(), StorageError> {
        self.open_handles = self.open_handles.saturating_sub(1);
        Ok(())
    }
}
