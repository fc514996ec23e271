//! Borrowed pixel target for a single draw call

/// A view over a platform-owned pixel buffer.
///
/// Logical coordinates have their origin at the bottom-left corner; rows are
/// flipped when written, so logical row 0 lands on the last buffer row.
/// `stride` is the number of pixels between the starts of two buffer rows and
/// may exceed `width` (display line padding).
pub struct Screen<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Screen<'a> {
    /// Wrap a tightly packed buffer (`stride == width`)
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Option<Self> {
        Self::with_stride(buffer, width, height, width)
    }

    /// Wrap a buffer whose rows are `stride` pixels apart.
    ///
    /// Returns `None` if the buffer cannot hold `height` rows of `stride`
    /// pixels or if `stride < width`.
    pub fn with_stride(
        buffer: &'a mut [u32],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Option<Self> {
        if stride < width || buffer.len() < stride.checked_mul(height)? {
            return None;
        }
        Some(Self {
            buffer,
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

    /// Number of visible pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Buffer index of logical pixel (x, y), or `None` when off screen
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((self.height - 1 - y) * self.stride + x)
    }

    /// Write a pixel at logical (x, y); out-of-range writes are dropped
    #[inline]
    pub fn set_color(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index_of(x, y) {
            self.buffer[idx] = color;
        }
    }

    /// Read the pixel at logical (x, y)
    #[inline]
    pub fn get_color(&self, x: i32, y: i32) -> Option<u32> {
        self.index_of(x, y).map(|idx| self.buffer[idx])
    }

    /// Fill every visible pixel with a color
    pub fn clear(&mut self, color: u32) {
        for row in self.buffer.chunks_mut(self.stride).take(self.height) {
            row[..self.width].fill(color);
        }
    }

    /// Raw buffer, including stride padding
    pub fn as_slice(&self) -> &[u32] {
        self.buffer
    }
}

/// Free-function form of [`Screen::set_color`]
#[inline]
pub fn set_color(screen: &mut Screen<'_>, x: i32, y: i32, color: u32) {
    screen.set_color(x, y, color);
}

/// Pack RGB values into a 32-bit color
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Split a packed color into its RGB channels
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}
