//! Frame pacing and double buffering

use renderer::Screen;
use std::thread;
use std::time::{Duration, Instant};

/// Frame timer for a fixed-rate loop.
///
/// `end_frame` sleeps off whatever is left of the frame budget, so the
/// measured delta includes the wait.
pub struct FrameClock {
    target_fps: u32,
    frame_time: Option<Duration>,
    frame_start: Instant,
    delta: Duration,
    frame_count: u64,
    fps_window_start: Instant,
    fps_frame_count: u32,
    current_fps: u32,
}

impl FrameClock {
    /// Clock pacing to `target_fps`; 0 disables pacing
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        let frame_time = (target_fps > 0).then(|| Duration::from_secs(1) / target_fps);
        Self {
            target_fps,
            frame_time,
            frame_start: now,
            delta: frame_time.unwrap_or_default(),
            frame_count: 0,
            fps_window_start: now,
            fps_frame_count: 0,
            current_fps: 0,
        }
    }

    /// Begin a new frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// End the current frame, sleeping to hold the target rate.
    /// Returns false if the frame ran over budget.
    pub fn end_frame(&mut self) -> bool {
        self.frame_count += 1;
        self.fps_frame_count += 1;

        let elapsed = self.frame_start.elapsed();
        let on_time = match self.frame_time {
            Some(budget) if elapsed < budget => {
                thread::sleep(budget - elapsed);
                true
            }
            Some(_) => false,
            None => true,
        };
        self.delta = self.frame_start.elapsed();

        let now = Instant::now();
        let window = now.duration_since(self.fps_window_start);
        if window >= Duration::from_secs(1) {
            self.current_fps = (self.fps_frame_count as f64 / window.as_secs_f64()) as u32;
            self.fps_frame_count = 0;
            self.fps_window_start = now;
        }

        on_time
    }

    /// Duration of the last completed frame in milliseconds
    pub fn delta_ms(&self) -> f32 {
        self.delta.as_secs_f32() * 1000.0
    }

    /// Frames per second over the last full one-second window
    pub fn fps(&self) -> u32 {
        self.current_fps
    }

    /// Frames finished so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get target frame rate
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }
}

/// Two pixel buffers: one being drawn, one on display
pub struct SwapChain {
    buffers: [Vec<u32>; 2],
    front: usize,
    width: usize,
    height: usize,
    stride: usize,
}

impl SwapChain {
    /// Allocate both buffers, or `None` if `stride < width`
    pub fn new(width: usize, height: usize, stride: usize) -> Option<Self> {
        if stride < width {
            return None;
        }
        let len = stride.checked_mul(height)?;
        Some(Self {
            buffers: [vec![0; len], vec![0; len]],
            front: 0,
            width,
            height,
            stride,
        })
    }

    /// Get visible width
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get visible height
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get row pitch in pixels
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Screen over the buffer not currently displayed
    pub fn back_screen(&mut self) -> Option<Screen<'_>> {
        let back = &mut self.buffers[1 - self.front];
        Screen::with_stride(back, self.width, self.height, self.stride)
    }

    /// Buffer currently displayed
    pub fn front(&self) -> &[u32] {
        &self.buffers[self.front]
    }

    /// Display the back buffer
    pub fn present(&mut self) {
        self.front = 1 - self.front;
    }
}
