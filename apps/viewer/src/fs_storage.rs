//! Host filesystem backend

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;
use streaming::{Storage, StorageError};

/// Serves asset paths relative to a root directory
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Storage serving paths relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the directory paths are resolved against
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

fn map_io(err: io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound,
        _ => StorageError::Io,
    }
}

impl Storage for FsStorage {
    type Handle = File;

    fn stat(&mut self, path: &str) -> Result<usize, StorageError> {
        let meta = fs::metadata(self.root.join(path)).map_err(map_io)?;
        if !meta.is_file() {
            return Err(StorageError::NotFound);
        }
        usize::try_from(meta.len()).map_err(|_| StorageError::Io)
    }

    fn open(&mut self, path: &str) -> Result<File, StorageError> {
        let full = self.root.join(path);
        log::debug!("opening {}", full.display());
        File::open(full).map_err(map_io)
    }

    fn read(&mut self, handle: &mut File, dst: &mut [u8]) -> Result<usize, StorageError> {
        loop {
            match handle.read(dst) {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                result => return result.map_err(map_io),
            }
        }
    }

    fn close(&mut self, handle: File) -> Result<(), StorageError> {
        drop(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("viewer-fs-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reads_file_in_chunks() {
        let dir = scratch_dir("chunks");
        fs::write(dir.join("mesh.obj"), b"v 0 0 0\n").unwrap();

        let mut storage = FsStorage::new(&dir);
        assert_eq!(storage.stat("mesh.obj"), Ok(8));
        let mut file = storage.open("mesh.obj").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(storage.read(&mut file, &mut buf[..5]), Ok(5));
        assert_eq!(storage.read(&mut file, &mut buf[5..]), Ok(3));
        assert_eq!(&buf, b"v 0 0 0\n");
        assert_eq!(storage.close(file), Ok(()));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = scratch_dir("missing");
        let mut storage = FsStorage::new(&dir);
        assert_eq!(storage.stat("nope.obj"), Err(StorageError::NotFound));
        assert!(matches!(storage.open("nope.obj"), Err(StorageError::NotFound)));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn directories_are_not_files() {
        let dir = scratch_dir("dirs");
        fs::create_dir_all(dir.join("sub")).unwrap();
        let mut storage = FsStorage::new(&dir);
        assert_eq!(storage.stat("sub"), Err(StorageError::NotFound));
        fs::remove_dir_all(dir).unwrap();
    }
}
