//! Flat (per-face) lighting

use crate::screen::rgb;
use glam::Vec3;

/// Light pointing into the screen, matching a viewer looking down -Z
pub const DEFAULT_LIGHT_DIR: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Unit normal of a world-space triangle, zero for degenerate faces
#[inline]
pub fn face_normal(world: &[Vec3; 3]) -> Vec3 {
    (world[2] - world[0])
        .cross(world[1] - world[0])
        .normalize_or_zero()
}

/// Lambert term of a face against a directional light
#[inline]
pub fn face_intensity(world: &[Vec3; 3], light_dir: Vec3) -> f32 {
    face_normal(world).dot(light_dir)
}

/// Grey level for a lit face.
///
/// Faces turned away from the light (intensity <= 0) are culled and yield
/// `None`; this is the only back-face rejection in the pipeline.
#[inline]
pub fn flat_color(intensity: f32) -> Option<u32> {
    if !(intensity > 0.0) {
        return None;
    }
    let level = (intensity.min(1.0) * 255.0) as u8;
    Some(rgb(level, level, level))
}
