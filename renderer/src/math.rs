//! Math utilities using glam

use glam::Vec3;

/// Map a normalized-device position (x, y in [-1, 1]) to pixel space.
///
/// y grows upward to match the screen's bottom-left origin; z passes through
/// unchanged as depth.
#[inline]
pub fn to_screen(v: Vec3, width: usize, height: usize) -> Vec3 {
    Vec3::new(
        libm::floorf((v.x + 1.0) * width as f32 / 2.0),
        libm::floorf((v.y + 1.0) * height as f32 / 2.0),
        v.z,
    )
}

/// Project all three corners of a triangle with [`to_screen`]
#[inline]
pub fn triangle_to_screen(world: &[Vec3; 3], width: usize, height: usize) -> [Vec3; 3] {
    world.map(|v| to_screen(v, width, height))
}
