//! Per-pixel depth for the triangle fill

use crate::screen::Screen;
use alloc::vec;
use alloc::vec::Vec;

/// Depth values for one screen, addressed in logical screen coordinates.
///
/// Larger z is closer to the viewer; a cleared buffer holds negative
/// infinity, so the first finite depth at a pixel always passes. A buffer is
/// only usable with a screen of the same width and height, see
/// [`DepthBuffer::matches`].
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    depths: Vec<f32>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    /// Cleared buffer of `width * height` depths
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depths: vec![f32::NEG_INFINITY; width.saturating_mul(height)],
            width,
            height,
        }
    }

    /// Cleared buffer sized for `screen`
    pub fn for_screen(screen: &Screen<'_>) -> Self {
        Self::new(screen.width(), screen.height())
    }

    /// Get buffer width
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get buffer height
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether this buffer covers exactly the visible area of `screen`
    #[inline]
    pub fn matches(&self, screen: &Screen<'_>) -> bool {
        self.width == screen.width() && self.height == screen.height()
    }

    /// Reallocate for `screen` if the dimensions differ, else leave as is.
    /// Returns true when the buffer was rebuilt.
    pub fn fit(&mut self, screen: &Screen<'_>) -> bool {
        if self.matches(screen) {
            return false;
        }
        *self = Self::for_screen(screen);
        true
    }

    /// Reset every depth to "nothing drawn yet"
    pub fn clear(&mut self) {
        self.depths.fill(f32::NEG_INFINITY);
    }

    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Store `depth` at logical (x, y) if it is closer than what is there.
    ///
    /// Returns whether the pixel should be drawn. Off-buffer coordinates and
    /// NaN depths never pass.
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, depth: f32) -> bool {
        let Some(idx) = self.index_of(x, y) else {
            return false;
        };
        let stored = &mut self.depths[idx];
        if depth > *stored {
            *stored = depth;
            true
        } else {
            false
        }
    }

    /// Depth stored at logical (x, y); negative infinity when off the buffer
    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> f32 {
        self.index_of(x, y)
            .map_or(f32::NEG_INFINITY, |idx| self.depths[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_depth_wins() {
        let mut zb = DepthBuffer::new(2, 2);
        assert!(zb.test_and_set(1, 1, -5.0));
        assert!(!zb.test_and_set(1, 1, -6.0));
        assert!(!zb.test_and_set(1, 1, -5.0));
        assert!(zb.test_and_set(1, 1, 0.5));
        assert_eq!(zb.depth_at(1, 1), 0.5);
    }

    #[test]
    fn out_of_range_and_nan_never_pass() {
        let mut zb = DepthBuffer::new(2, 2);
        assert!(!zb.test_and_set(2, 0, 1.0));
        assert!(!zb.test_and_set(0, 2, 1.0));
        assert!(!zb.test_and_set(-1, 0, 1.0));
        assert!(!zb.test_and_set(0, 0, f32::NAN));
        assert_eq!(zb.depth_at(0, 0), f32::NEG_INFINITY);
    }

    #[test]
    fn clear_resets_to_far() {
        let mut zb = DepthBuffer::new(1, 1);
        zb.test_and_set(0, 0, 3.0);
        zb.clear();
        assert_eq!(zb.depth_at(0, 0), f32::NEG_INFINITY);
    }

    #[test]
    fn fit_follows_screen_size() {
        let mut buf = vec![0u32; 6 * 4];
        let screen = Screen::new(&mut buf, 6, 4).unwrap();
        let mut zb = DepthBuffer::new(3, 3);
        zb.test_and_set(0, 0, 1.0);
        assert!(!zb.matches(&screen));

        assert!(zb.fit(&screen));
        assert!(zb.matches(&screen));
        assert_eq!((zb.width(), zb.height()), (6, 4));
        assert_eq!(zb.depth_at(0, 0), f32::NEG_INFINITY);

        zb.test_and_set(5, 3, 1.0);
        assert!(!zb.fit(&screen));
        assert_eq!(zb.depth_at(5, 3), 1.0);
    }
}
