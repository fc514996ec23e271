//! Viewer configuration
//!
//! Parsed from a `key=value` command line, e.g.
//! `model=obj/african_head.obj width=480 height=272 frames=120 out=frame.ppm`.
//! Unknown keys are ignored and unparsable numbers keep their defaults.

use streaming::DEFAULT_CHUNK_SIZE;

/// Display width of the reference handheld target
pub const DEFAULT_WIDTH: usize = 480;
pub const DEFAULT_HEIGHT: usize = 272;
/// Display line length in pixels (power-of-two padded)
pub const DEFAULT_STRIDE: usize = 512;
pub const DEFAULT_FPS: u32 = 60;
/// Arena capacity in bytes
pub const DEFAULT_ARENA_SIZE: usize = 4 * 1024 * 1024;
/// Frames to run before exiting
pub const DEFAULT_FRAMES: u64 = 600;
pub const DEFAULT_MODEL: &str = "obj/african_head.obj";

/// Everything the viewer needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Model file to stream, relative to the working directory
    pub model: String,
    pub width: usize,
    pub height: usize,
    /// Pixels between buffer rows, at least `width`
    pub stride: usize,
    /// Frame pacing target; 0 runs unpaced
    pub target_fps: u32,
    pub arena_size: usize,
    /// Bytes read from storage per tick
    pub chunk_size: usize,
    /// Frames to run before exiting
    pub frames: u64,
    /// Write the last presented frame here as a PPM image
    pub output: Option<String>,
    pub wireframe: bool,
    pub debug: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: String::from(DEFAULT_MODEL),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            stride: DEFAULT_STRIDE,
            target_fps: DEFAULT_FPS,
            arena_size: DEFAULT_ARENA_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            frames: DEFAULT_FRAMES,
            output: None,
            wireframe: false,
            debug: false,
        }
    }
}

impl ViewerConfig {
    /// Parse configuration from a whitespace separated command line
    pub fn from_cmdline(cmdline: &str) -> Self {
        let mut config = Self::default();

        for token in cmdline.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                match token {
                    "wireframe" => config.wireframe = true,
                    "debug" => config.debug = true,
                    _ => log::warn!("ignoring unknown flag {token:?}"),
                }
                continue;
            };

            match key {
                "model" if !value.is_empty() => config.model = String::from(value),
                "out" if !value.is_empty() => config.output = Some(String::from(value)),
                "width" => set_positive(&mut config.width, value),
                "height" => set_positive(&mut config.height, value),
                "stride" => set_positive(&mut config.stride, value),
                "arena" => set_positive(&mut config.arena_size, value),
                "chunk" => set_positive(&mut config.chunk_size, value),
                "frames" => set_positive(&mut config.frames, value),
                // 0 is meaningful here: no pacing
                "fps" => {
                    if let Ok(fps) = value.parse() {
                        config.target_fps = fps;
                    }
                }
                _ => log::warn!("ignoring unknown option {token:?}"),
            }
        }

        // A line can never be shorter than the visible row
        if config.stride < config.width {
            config.stride = config.width;
        }

        config
    }

    /// Parse from process arguments, skipping the program name
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let cmdline = args.into_iter().skip(1).collect::<Vec<_>>().join(" ");
        Self::from_cmdline(&cmdline)
    }

    /// Target frame time in milliseconds, if paced
    pub fn frame_time_ms(&self) -> Option<f32> {
        (self.target_fps > 0).then(|| 1000.0 / self.target_fps as f32)
    }
}

fn set_positive<T>(slot: &mut T, value: &str)
where
    T: core::str::FromStr + Default + PartialEq,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed != T::default() => *slot = parsed,
        _ => log::warn!("ignoring invalid value {value:?}"),
    }
}
