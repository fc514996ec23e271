//! Platform half of the asset pump
//!
//! Storage access goes through the [`Storage`] capability trait, so the
//! state machine never names a concrete OS handle type. [`StorageDriver`]
//! advances an asset through the states that need real file operations:
//! stat + open, one bounded read per tick, and close.

use crate::arena::Arena;
use crate::asset::{Asset, AssetState};
use crate::error::{AssetError, StorageError};

/// Default bytes read per tick
pub const DEFAULT_CHUNK_SIZE: usize = 512 * 1024;

/// Capability interface to a block storage device
pub trait Storage {
    /// Open-file handle, held in the asset between ticks
    type Handle;

    /// Size in bytes of the file at `path`
    fn stat(&mut self, path: &str) -> Result<usize, StorageError>;

    /// Open the file at `path` for sequential reads
    fn open(&mut self, path: &str) -> Result<Self::Handle, StorageError>;

    /// Read into `dst`, returning the number of bytes read (possibly fewer
    /// than `dst.len()`)
    fn read(&mut self, handle: &mut Self::Handle, dst: &mut [u8]) -> Result<usize, StorageError>;

    /// Release a handle returned by [`Storage::open`]
    fn close(&mut self, handle: Self::Handle) -> Result<(), StorageError>;
}

/// Drives the storage-owned transitions of an [`Asset`]
pub struct StorageDriver<S> {
    storage: S,
    chunk_size: usize,
}

impl<S: Storage> StorageDriver<S> {
    /// Driver reading [`DEFAULT_CHUNK_SIZE`] bytes per tick
    pub fn new(storage: S) -> Self {
        Self::with_chunk_size(storage, DEFAULT_CHUNK_SIZE)
    }

    /// Driver reading at most `chunk_size` bytes per tick (at least one)
    pub fn with_chunk_size(storage: S, chunk_size: usize) -> Self {
        Self {
            storage,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Get bytes read per tick
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get the storage backend mutably
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Advance the platform half of a transfer by one step.
    ///
    /// A no-op in every state owned by [`crate::asset::pump_core`].
    pub fn pump(&mut self, asset: &mut Asset<S::Handle>, arena: &mut Arena) {
        match asset.state {
            AssetState::Requested => {
                if let Err(err) = self.resolve(asset) {
                    asset.fail(err);
                }
            }
            AssetState::Uploading => match self.read_chunk(asset, arena) {
                Ok(read) => {
                    asset.uploaded += read;
                    if asset.uploaded == asset.size {
                        log::debug!("asset {}: upload finished ({} bytes)", asset.path, asset.size);
                        asset.transition(AssetState::Uploaded);
                    }
                }
                Err(err) => asset.fail(err),
            },
            AssetState::Completed => {
                let Some(handle) = asset.ctx.take() else {
                    asset.fail(AssetError::ProtocolViolation);
                    return;
                };
                match self.storage.close(handle) {
                    Ok(()) => asset.transition(AssetState::Released),
                    Err(err) => asset.fail(err.into()),
                }
            }
            _ => {}
        }
    }

    /// Close the handle a failed asset still holds.
    ///
    /// Only acts on an Undefined asset; its state and fault are kept, so the
    /// failure stays visible and nothing is re-requested. Returns whether a
    /// handle was closed.
    pub fn reclaim(&mut self, asset: &mut Asset<S::Handle>) -> Result<bool, StorageError> {
        if !asset.state.is_terminal() {
            return Ok(false);
        }
        let Some(handle) = asset.ctx.take() else {
            return Ok(false);
        };
        log::debug!("asset {}: closing handle after {:?}", asset.path, asset.fault);
        self.storage.close(handle)?;
        Ok(true)
    }

    fn resolve(&mut self, asset: &mut Asset<S::Handle>) -> Result<(), AssetError> {
        if asset.ctx.is_some() {
            return Err(AssetError::ProtocolViolation);
        }
        let path = asset.path.as_str().ok_or(AssetError::ProtocolViolation)?;

        let size = self.storage.stat(path).inspect_err(|err| {
            log::warn!("stat {path}: {err}");
        })?;
        let handle = self.storage.open(path).inspect_err(|err| {
            log::warn!("open {path}: {err}");
        })?;

        asset.size = size;
        asset.uploaded = 0;
        asset.ctx = Some(handle);
        asset.transition(AssetState::Resolved);
        Ok(())
    }

    /// Read the next chunk into the bound buffer, returning bytes read
    fn read_chunk(&mut self, asset: &mut Asset<S::Handle>, arena: &mut Arena) -> Result<usize, AssetError> {
        let span = asset.data.ok_or(AssetError::ProtocolViolation)?;
        let handle = asset.ctx.as_mut().ok_or(AssetError::ProtocolViolation)?;
        let dst = arena.bytes_mut(span)?;
        if dst.len() != asset.size || asset.uploaded > asset.size {
            return Err(AssetError::ProtocolViolation);
        }

        let start = asset.uploaded;
        let want = (asset.size - start).min(self.chunk_size);
        let read = self.storage.read(handle, &mut dst[start..start + want])?;
        if read > want {
            return Err(AssetError::ProtocolViolation);
        }
        if read < want {
            log::trace!("asset {}: short read {read}/{want}", asset.path);
        }
        Ok(read)
    }
}
