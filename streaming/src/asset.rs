//! Asset transfer state and the platform-independent pump
//!
//! One transfer is driven by two step functions sharing the asset's state
//! field. [`pump_core`] owns Inactive, Resolved, Uploaded and Released; the
//! storage driver ([`crate::driver::StorageDriver::pump`]) owns Requested,
//! Uploading and Completed. Each is a no-op in the other's states, so the
//! orchestrator simply calls both once per tick in a fixed order.

use crate::arena::{Arena, Span};
use crate::error::AssetError;
use crate::path::AssetPath;
use crate::resource::{Resource, ResourceState};

/// Transfer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetState {
    /// Idle, waiting for an inactive resource
    #[default]
    Inactive,
    /// Path set; storage must stat and open it
    Requested,
    /// Size known and handle open; core must allocate the buffer
    Resolved,
    /// Buffer bound; storage reads one chunk per tick
    Uploading,
    /// All bytes read; core hands them to the resource
    Uploaded,
    /// Resource owns the bytes; storage must close the handle
    Completed,
    /// Handle closed; core returns the asset to idle
    Released,
    /// Terminal failure, see [`Asset::fault`]
    Undefined,
}

impl AssetState {
    /// Get state name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Requested => "requested",
            Self::Resolved => "resolved",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Completed => "completed",
            Self::Released => "released",
            Self::Undefined => "undefined",
        }
    }

    /// States where the storage driver is expected to act
    pub fn is_driver_owned(&self) -> bool {
        matches!(self, Self::Requested | Self::Uploading | Self::Completed)
    }

    /// Whether no transition leaves this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// The streaming unit that moves one resource's bytes into the arena.
///
/// `H` is the storage backend's handle type; the core never inspects it.
#[derive(Debug)]
pub struct Asset<H> {
    pub(crate) ctx: Option<H>,
    pub(crate) path: AssetPath,
    pub(crate) data: Option<Span>,
    pub(crate) size: usize,
    pub(crate) uploaded: usize,
    pub(crate) state: AssetState,
    pub(crate) fault: Option<AssetError>,
}

impl<H> Default for Asset<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Asset<H> {
    /// Idle asset with no path
    pub const fn new() -> Self {
        Self {
            ctx: None,
            path: AssetPath::EMPTY,
            data: None,
            size: 0,
            uploaded: 0,
            state: AssetState::Inactive,
            fault: None,
        }
    }

    /// Get current state
    #[inline]
    pub fn state(&self) -> AssetState {
        self.state
    }

    /// Get requested path
    #[inline]
    pub fn path(&self) -> &AssetPath {
        &self.path
    }

    /// Total bytes, meaningful from Resolved onward
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes transferred so far
    #[inline]
    pub fn uploaded(&self) -> usize {
        self.uploaded
    }

    /// Destination buffer while uploading
    #[inline]
    pub fn data(&self) -> Option<Span> {
        self.data
    }

    /// Why the asset is Undefined, if it is
    #[inline]
    pub fn fault(&self) -> Option<AssetError> {
        self.fault
    }

    /// Whether the storage backend currently holds an open handle for us
    #[inline]
    pub fn has_context(&self) -> bool {
        self.ctx.is_some()
    }

    /// `(uploaded, size)` for a progress readout
    #[inline]
    pub fn progress(&self) -> (usize, usize) {
        (self.uploaded, self.size)
    }

    /// Return to the idle baseline, clearing any fault.
    ///
    /// This is the only way out of Undefined. An open handle is handed back
    /// so the caller can close it with the backend that issued it.
    pub fn reset(&mut self) -> Option<H> {
        let ctx = self.ctx.take();
        let had_handle = ctx.is_some();
        *self = Self::new();
        log::debug!("asset reset (open handle returned: {had_handle})");
        ctx
    }

    pub(crate) fn transition(&mut self, next: AssetState) {
        log::trace!(
            "asset {}: {} -> {}",
            self.path,
            self.state.name(),
            next.name()
        );
        self.state = next;
    }

    pub(crate) fn fail(&mut self, err: AssetError) {
        log::warn!(
            "asset {} failed in state {}: {}",
            self.path,
            self.state.name(),
            err
        );
        self.fault = Some(err);
        self.state = AssetState::Undefined;
    }

    fn request(&mut self, path: &[u8]) {
        self.path.set(path);
        self.data = None;
        self.uploaded = 0;
        self.size = 0;
        self.transition(AssetState::Requested);
    }

    fn upload(&mut self, dst: Span) {
        self.data = Some(dst);
        self.transition(AssetState::Uploading);
    }

    fn complete(&mut self) {
        self.data = None;
        self.uploaded = 0;
        self.size = 0;
        self.transition(AssetState::Completed);
    }

    fn release(&mut self) {
        self.path.clear();
        self.data = None;
        self.uploaded = 0;
        self.size = 0;
        self.transition(AssetState::Inactive);
    }
}

/// Advance the platform-independent half of a transfer.
///
/// Never touches storage: it only allocates from `arena`, moves spans and
/// sizes, and flips the resource to Completed. Call at most once per tick
/// per asset/resource pair.
pub fn pump_core<H>(asset: &mut Asset<H>, resource: &mut Resource, arena: &mut Arena) {
    match asset.state {
        AssetState::Requested | AssetState::Uploading | AssetState::Completed => {}

        AssetState::Inactive => {
            if resource.state() != ResourceState::Inactive {
                return;
            }
            match resource.path_bytes(arena) {
                Ok(path) => asset.request(path),
                Err(err) => asset.fail(err.into()),
            }
        }

        AssetState::Resolved => match arena.alloc(asset.size) {
            Ok(dst) => asset.upload(dst),
            Err(err) => {
                log::warn!("asset {}: {}", asset.path, err);
                asset.fail(err.into());
            }
        },

        AssetState::Uploaded => {
            let (Some(data), true) = (asset.data, asset.uploaded == asset.size) else {
                asset.fail(AssetError::ProtocolViolation);
                return;
            };
            resource.complete(data, asset.size);
            log::debug!("asset {}: {} bytes handed to resource", asset.path, asset.size);
            asset.complete();
        }

        AssetState::Released => asset.release(),

        AssetState::Undefined => resource.abandon(),
    }
}
