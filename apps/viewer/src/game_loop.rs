//! Viewer Loop
//!
//! One [`Viewer::tick`] per displayed frame: advance the asset pump (core
//! half, then storage half), decode the mesh once its bytes land, draw into
//! the back buffer and present it.

use crate::config::ViewerConfig;
use crate::frame::SwapChain;
use core::fmt;
use renderer::shading::DEFAULT_LIGHT_DIR;
use renderer::{
    DecodeError, DepthBuffer, MeshDecoder, Model, ObjDecoder, RenderStats, Screen, draw_flat,
    draw_line, draw_wireframe, rgb,
};
use streaming::{
    Arena, ArenaError, Asset, AssetError, AssetState, PATH_MAX_LEN, Resource, Storage,
    StorageDriver, pump_core,
};

/// Background of every frame
pub const CLEAR_COLOR: u32 = rgb(0, 0, 0);
/// Edge color in wireframe mode
pub const WIREFRAME_COLOR: u32 = rgb(255, 255, 255);
const BAR_FRAME_COLOR: u32 = rgb(200, 200, 200);
const BAR_FILL_COLOR: u32 = rgb(0, 160, 255);
const BAR_HALF_HEIGHT: i32 = 4;

/// Start-up failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerError {
    /// Display dimensions cannot back a swap chain
    Display {
        width: usize,
        height: usize,
        stride: usize,
    },
    /// Arena too small to even register the model
    Arena(ArenaError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display {
                width,
                height,
                stride,
            } => write!(f, "invalid display {width}x{height} with stride {stride}"),
            Self::Arena(err) => write!(f, "cannot register model: {err}"),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<ArenaError> for ViewerError {
    fn from(err: ArenaError) -> Self {
        Self::Arena(err)
    }
}

/// What the viewer is doing after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Bytes still streaming in
    Loading { uploaded: usize, size: usize },
    /// Model decoded and drawn
    Ready,
    /// Transfer ended in Undefined
    LoadFailed(AssetError),
    /// Bytes arrived but are not a mesh
    DecodeFailed(DecodeError),
}

impl TickStatus {
    /// Whether further ticks can change anything
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::LoadFailed(_) | Self::DecodeFailed(_))
    }
}

/// Streams one model and renders it every frame
pub struct Viewer<S: Storage> {
    arena: Arena,
    resource: Resource,
    asset: Asset<S::Handle>,
    driver: StorageDriver<S>,
    model: Option<Model>,
    decode_error: Option<DecodeError>,
    swap: SwapChain,
    depth: DepthBuffer,
    wireframe: bool,
    stats: RenderStats,
    frames: u64,
    elapsed_ms: f32,
}

impl<S: Storage> Viewer<S> {
    /// Set up display buffers and register `model_path` with `storage`
    pub fn new(config: &ViewerConfig, model_path: &str, storage: S) -> Result<Self, ViewerError> {
        let swap = SwapChain::new(config.width, config.height, config.stride).ok_or(
            ViewerError::Display {
                width: config.width,
                height: config.height,
                stride: config.stride,
            },
        )?;

        if model_path.len() > PATH_MAX_LEN {
            log::warn!("model path longer than {PATH_MAX_LEN} bytes will be truncated: {model_path}");
        }

        let mut arena = Arena::with_capacity(config.arena_size);
        let resource = Resource::new(model_path, &mut arena)?;
        log::info!(
            "viewer {}x{} (stride {}), arena {} KiB, chunk {} KiB",
            config.width,
            config.height,
            config.stride,
            config.arena_size / 1024,
            config.chunk_size / 1024
        );

        Ok(Self {
            arena,
            resource,
            asset: Asset::new(),
            driver: StorageDriver::with_chunk_size(storage, config.chunk_size),
            model: None,
            decode_error: None,
            swap,
            depth: DepthBuffer::new(config.width, config.height),
            wireframe: config.wireframe,
            stats: RenderStats::default(),
            frames: 0,
            elapsed_ms: 0.0,
        })
    }

    /// Run one frame. `dt_ms` is the duration of the previous frame.
    pub fn tick(&mut self, dt_ms: f32) -> TickStatus {
        self.frames += 1;
        self.elapsed_ms += dt_ms;

        pump_core(&mut self.asset, &mut self.resource, &mut self.arena);
        self.driver.pump(&mut self.asset, &mut self.arena);
        // A failed load keeps its fault but must not keep its file open
        if let Err(err) = self.driver.reclaim(&mut self.asset) {
            log::warn!("closing handle of failed load: {err}");
        }
        self.decode_if_ready();

        self.render();
        self.status()
    }

    fn decode_if_ready(&mut self) {
        if self.model.is_some() || self.decode_error.is_some() || !self.resource.is_completed() {
            return;
        }
        let Some(bytes) = self.resource.data(&self.arena) else {
            log::error!("completed resource has no live payload");
            return;
        };

        match ObjDecoder.decode(bytes) {
            Ok(model) => {
                log::info!(
                    "loaded {} bytes in {} frames ({:.1} ms): {} vertices, {} faces",
                    bytes.len(),
                    self.frames,
                    self.elapsed_ms,
                    model.nverts(),
                    model.nfaces()
                );
                self.model = Some(model);
            }
            Err(err) => {
                log::error!("decode failed: {err}");
                self.decode_error = Some(err);
            }
        }
    }

    fn status(&self) -> TickStatus {
        if let Some(err) = self.decode_error {
            return TickStatus::DecodeFailed(err);
        }
        if self.model.is_some() {
            return TickStatus::Ready;
        }
        if let Some(fault) = self.asset.fault() {
            return TickStatus::LoadFailed(fault);
        }
        let (uploaded, size) = self.asset.progress();
        TickStatus::Loading { uploaded, size }
    }

    fn render(&mut self) {
        let Some(mut screen) = self.swap.back_screen() else {
            log::error!("back buffer does not fit the display");
            return;
        };
        screen.clear(CLEAR_COLOR);

        self.stats = match &self.model {
            Some(model) if self.wireframe => draw_wireframe(&mut screen, model, WIREFRAME_COLOR),
            Some(model) => {
                self.depth.clear();
                draw_flat(&mut screen, &mut self.depth, model, DEFAULT_LIGHT_DIR)
            }
            None => {
                draw_progress_bar(&mut screen, self.asset.progress());
                RenderStats::default()
            }
        };

        self.swap.present();
    }

    /// Buffer on display after the last tick
    pub fn front(&self) -> &[u32] {
        self.swap.front()
    }

    /// Get the display buffers
    pub fn swap_chain(&self) -> &SwapChain {
        &self.swap
    }

    /// Counters from the last draw pass
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Decoded mesh, once loaded
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Get transfer state
    pub fn asset_state(&self) -> AssetState {
        self.asset.state()
    }

    /// Get the model resource
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Get the backing arena
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Get the storage backend
    pub fn storage(&self) -> &S {
        self.driver.storage()
    }

    /// Ticks run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Outlined bar in the middle of the screen, filled by `uploaded / size`
fn draw_progress_bar(screen: &mut Screen<'_>, (uploaded, size): (usize, usize)) {
    let w = i32::try_from(screen.width()).unwrap_or(i32::MAX);
    let h = i32::try_from(screen.height()).unwrap_or(i32::MAX);
    let (x0, x1) = (w / 4, w - w / 4);
    let (y0, y1) = (h / 2 - BAR_HALF_HEIGHT, h / 2 + BAR_HALF_HEIGHT);

    // Far endpoints are exclusive
    draw_line(screen, x0, y0, x1, y0, BAR_FRAME_COLOR);
    draw_line(screen, x0, y1, x1 + 1, y1, BAR_FRAME_COLOR);
    draw_line(screen, x0, y0, x0, y1, BAR_FRAME_COLOR);
    draw_line(screen, x1, y0, x1, y1, BAR_FRAME_COLOR);

    if size == 0 {
        return;
    }
    let inner = (x1 - x0 - 1).max(0);
    let filled = (inner as f32 * uploaded.min(size) as f32 / size as f32) as i32;
    for y in y0 + 1..y1 {
        draw_line(screen, x0 + 1, y, x0 + 1 + filled, y, BAR_FILL_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streaming::MemoryStorage;

    fn small_config() -> ViewerConfig {
        ViewerConfig::from_cmdline("width=32 height=32 stride=32 arena=4096 chunk=16")
    }

    #[test]
    fn bad_display_is_rejected() {
        let mut config = small_config();
        config.stride = 8;
        let err = Viewer::new(&config, "m.obj", MemoryStorage::new()).err();
        assert_eq!(
            err,
            Some(ViewerError::Display {
                width: 32,
                height: 32,
                stride: 8
            })
        );
    }

    #[test]
    fn tiny_arena_is_rejected() {
        let mut config = small_config();
        config.arena_size = 2;
        assert!(matches!(
            Viewer::new(&config, "m.obj", MemoryStorage::new()),
            Err(ViewerError::Arena(ArenaError::Exhausted { .. }))
        ));
    }

    #[test]
    fn progress_bar_tracks_upload() {
        let payload = [b'#'; 64];
        let storage = MemoryStorage::new().with_file("m.obj", &payload);
        let mut viewer = Viewer::new(&small_config(), "m.obj", storage).unwrap();

        assert_eq!(viewer.tick(16.0), TickStatus::Loading { uploaded: 0, size: 64 });
        assert_eq!(viewer.tick(16.0), TickStatus::Loading { uploaded: 16, size: 64 });

        // Bar outline plus a partial fill
        let front = viewer.front();
        assert!(front.contains(&BAR_FRAME_COLOR));
        assert!(front.contains(&BAR_FILL_COLOR));
    }

    #[test]
    fn missing_model_fails() {
        let mut viewer = Viewer::new(&small_config(), "m.obj", MemoryStorage::new()).unwrap();
        viewer.tick(16.0);
        let status = viewer.tick(16.0);
        assert_eq!(status, TickStatus::LoadFailed(AssetError::StorageUnavailable));
        assert!(status.is_failed());
    }

    #[test]
    fn failed_load_closes_its_file() {
        let mut config = small_config();
        config.arena_size = 64;
        let storage = MemoryStorage::new().with_file("m.obj", &[b'#'; 500]);
        let mut viewer = Viewer::new(&config, "m.obj", storage).unwrap();

        viewer.tick(16.0);
        assert_eq!(viewer.storage().open_handles(), 1);
        let status = viewer.tick(16.0);
        assert_eq!(status, TickStatus::LoadFailed(AssetError::Exhausted));
        assert_eq!(viewer.storage().open_handles(), 0);

        // The failure stays reported on later frames
        assert_eq!(viewer.tick(16.0), status);
        assert_eq!(viewer.asset_state(), AssetState::Undefined);
        assert_eq!(viewer.storage().open_handles(), 0);
    }

    #[test]
    fn garbage_payload_fails_to_decode() {
        let storage = MemoryStorage::new().with_file("m.obj", b"v 1 2\n");
        let mut viewer = Viewer::new(&small_config(), "m.obj", storage).unwrap();
        let mut status = TickStatus::Ready;
        for _ in 0..4 {
            status = viewer.tick(16.0);
        }
        assert_eq!(status, TickStatus::DecodeFailed(DecodeError::MalformedVertex { line: 1 }));
    }
}
