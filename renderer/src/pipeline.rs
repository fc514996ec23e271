//! Model draw passes
//!
//! Models are expected in normalized device space ([-1, 1] on x and y, z as
//! depth with larger values closer); vertices go straight through the
//! viewport mapping, with no camera or perspective transform.

use crate::math::triangle_to_screen;
use crate::mesh::Model;
use crate::rasterizer::{draw_triangle, draw_triangle_outline};
use crate::screen::Screen;
use crate::shading::{face_intensity, flat_color};
use crate::zbuffer::DepthBuffer;
use glam::Vec3;

/// Per-pass counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Faces that produced output
    pub drawn: usize,
    /// Faces rejected by the lighting test or with broken indices
    pub culled: usize,
    /// Pixels written
    pub pixels: usize,
}

/// Draw every face edge in a single color
pub fn draw_wireframe(screen: &mut Screen<'_>, model: &Model, color: u32) -> RenderStats {
    let (width, height) = (screen.width(), screen.height());
    let mut stats = RenderStats::default();

    for i in 0..model.nfaces() {
        let Some(world) = model.triangle(i) else {
            stats.culled += 1;
            continue;
        };
        draw_triangle_outline(screen, &triangle_to_screen(&world, width, height), color);
        stats.drawn += 1;
    }
    stats
}

/// Fill every lit face with its flat-shaded grey, depth tested.
///
/// `depth` is resized to the screen first if it does not match.
pub fn draw_flat(
    screen: &mut Screen<'_>,
    depth: &mut DepthBuffer,
    model: &Model,
    light_dir: Vec3,
) -> RenderStats {
    depth.fit(screen);
    let (width, height) = (screen.width(), screen.height());
    let mut stats = RenderStats::default();

    for i in 0..model.nfaces() {
        let Some(world) = model.triangle(i) else {
            stats.culled += 1;
            continue;
        };
        let Some(color) = flat_color(face_intensity(&world, light_dir)) else {
            stats.culled += 1;
            continue;
        };

        let tri = triangle_to_screen(&world, width, height);
        stats.pixels += draw_triangle(screen, &tri, Some(depth), color);
        stats.drawn += 1;
    }
    stats
}
