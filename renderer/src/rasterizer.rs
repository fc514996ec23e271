//! Line and triangle rasterization
//!
//! Integer Bresenham lines and a bounding-box triangle fill driven by
//! barycentric coordinates, with an optional z-buffer. Triangles arrive in
//! screen space: x/y in pixels (bottom-left origin), z as depth where larger
//! values are closer.

use crate::screen::Screen;
use crate::zbuffer::DepthBuffer;
use glam::{Vec2, Vec3};

/// Cross products with a z magnitude below this are treated as zero-area
pub const DEGENERATE_EPSILON: f32 = 1e-2;

/// Barycentric result for a zero-area triangle; always rejected by the fill
pub const DEGENERATE_SENTINEL: Vec3 = Vec3::new(-1.0, 1.0, 1.0);

/// Draw a line using Bresenham's algorithm.
///
/// Always steps along the longer axis. The far endpoint is not drawn, so
/// `(0, 0) -> (4, 0)` covers x = 0..=3.
pub fn draw_line(screen: &mut Screen<'_>, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, mut x1, mut y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);

    let steep = (x0 - x1).abs() < (y0 - y1).abs();
    if steep {
        core::mem::swap(&mut x0, &mut y0);
        core::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        core::mem::swap(&mut x0, &mut x1);
        core::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let derror2 = (y1 - y0).abs() * 2;
    let ystep = if y1 > y0 { 1 } else { -1 };

    // Walk only the part of the major axis that lands on screen
    let extent = if steep { screen.height() } else { screen.width() };
    let start = x0.max(0);
    let end = x1.min(i64::try_from(extent).unwrap_or(i64::MAX));
    if start >= end {
        return;
    }
    let (taken, mut error2) = bresenham_state(start - x0, dx, derror2);
    let mut y = y0 + ystep * taken;

    for x in start..end {
        if steep {
            put(screen, y, x, color);
        } else {
            put(screen, x, y, color);
        }
        error2 += derror2;
        if error2 > dx {
            y += ystep;
            error2 -= dx * 2;
        }
    }
}

/// Minor-axis steps taken and error term after `steps` iterations of the
/// line loop, so a clipped walk resumes exactly where the full one would be
fn bresenham_state(steps: i64, dx: i64, derror2: i64) -> (i64, i64) {
    let (steps, dx, derror2) = (i128::from(steps), i128::from(dx), i128::from(derror2));
    let accumulated = steps * derror2;
    let taken = if accumulated > dx {
        (accumulated + dx - 1) / (2 * dx)
    } else {
        0
    };
    // Both fit: taken <= steps and the error stays within (-dx, dx]
    (taken as i64, (accumulated - taken * 2 * dx) as i64)
}

#[inline]
fn put(screen: &mut Screen<'_>, x: i64, y: i64, color: u32) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        screen.set_color(x, y, color);
    }
}

/// Draw the three edges of a screen-space triangle
pub fn draw_triangle_outline(screen: &mut Screen<'_>, tri: &[Vec3; 3], color: u32) {
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        draw_line(screen, a.x as i32, a.y as i32, b.x as i32, b.y as i32, color);
    }
}

/// Barycentric coordinates of `p` with respect to the xy projection of `tri`.
///
/// Components are the weights of `tri[0]`, `tri[1]`, `tri[2]`. A zero-area
/// triangle yields [`DEGENERATE_SENTINEL`], whose negative component makes the
/// caller reject the point.
pub fn barycentric(tri: &[Vec3; 3], p: Vec2) -> Vec3 {
    let [a, b, c] = *tri;
    let u = Vec3::new(c.x - a.x, b.x - a.x, a.x - p.x).cross(Vec3::new(
        c.y - a.y,
        b.y - a.y,
        a.y - p.y,
    ));
    if u.z.abs() < DEGENERATE_EPSILON {
        return DEGENERATE_SENTINEL;
    }
    Vec3::new(1.0 - (u.x + u.y) / u.z, u.y / u.z, u.x / u.z)
}

/// Fill a screen-space triangle with a flat color.
///
/// Pixels are sampled at integer coordinates inside the triangle's bounding
/// box (clamped to the screen). With a depth buffer, a pixel is written only
/// when its interpolated depth is closer than the stored one. Returns the
/// number of pixels written.
///
/// A depth buffer whose size differs from the screen is refused and nothing
/// is drawn; size it with [`DepthBuffer::for_screen`] or [`DepthBuffer::fit`].
pub fn draw_triangle(
    screen: &mut Screen<'_>,
    tri: &[Vec3; 3],
    mut depth: Option<&mut DepthBuffer>,
    color: u32,
) -> usize {
    let (width, height) = (screen.width(), screen.height());
    if width == 0 || height == 0 {
        return 0;
    }
    if depth.as_deref().is_some_and(|zb| !zb.matches(screen)) {
        return 0;
    }

    let clamp = Vec2::new((width - 1) as f32, (height - 1) as f32);
    let mut bbox_min = clamp;
    let mut bbox_max = Vec2::ZERO;
    for v in tri {
        let v = v.truncate();
        bbox_min = bbox_min.min(v).max(Vec2::ZERO);
        bbox_max = bbox_max.max(v).min(clamp);
    }

    let x_start = libm::ceilf(bbox_min.x) as i32;
    let x_end = libm::floorf(bbox_max.x) as i32;
    let y_start = libm::ceilf(bbox_min.y) as i32;
    let y_end = libm::floorf(bbox_max.y) as i32;

    let mut written = 0;
    for y in y_start..=y_end {
        for x in x_start..=x_end {
            let bc = barycentric(tri, Vec2::new(x as f32, y as f32));
            // NaN weights fail every comparison and are rejected too
            if !(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0) {
                continue;
            }

            let z = tri[0].z * bc.x + tri[1].z * bc.y + tri[2].z * bc.z;
            if let Some(zb) = depth.as_deref_mut() {
                if !zb.test_and_set(x, y, z) {
                    continue;
                }
            }

            screen.set_color(x, y, color);
            written += 1;
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::rgb;
    use alloc::vec;
    use alloc::vec::Vec;

    const W: usize = 16;
    const H: usize = 16;

    fn lit(buf: &[u32]) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for row in 0..H {
            for x in 0..W {
                if buf[row * W + x] != 0 {
                    // back to logical y
                    out.push((x as i32, (H - 1 - row) as i32));
                }
            }
        }
        out
    }

    #[test]
    fn horizontal_line_excludes_far_endpoint() {
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        draw_line(&mut screen, 0, 0, 4, 0, 0xffffff);
        assert_eq!(lit(&buf), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        // Logical row 0 is the last buffer row
        assert_eq!(&buf[(H - 1) * W..(H - 1) * W + 5], &[0xffffff, 0xffffff, 0xffffff, 0xffffff, 0]);
    }

    #[test]
    fn reversed_endpoints_cover_same_span() {
        let mut a = vec![0u32; W * H];
        let mut b = vec![0u32; W * H];
        draw_line(&mut Screen::new(&mut a, W, H).unwrap(), 1, 2, 9, 5, 1);
        draw_line(&mut Screen::new(&mut b, W, H).unwrap(), 9, 5, 1, 2, 1);
        assert_eq!(lit(&a).len(), 8);
        assert_eq!(lit(&b).len(), 8);
    }

    #[test]
    fn steep_line_steps_along_y() {
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        draw_line(&mut screen, 2, 0, 3, 6, 1);
        let pixels = lit(&buf);
        assert_eq!(pixels.len(), 6);
        let mut ys: Vec<i32> = pixels.iter().map(|p| p.1).collect();
        ys.sort();
        assert_eq!(ys, vec![0, 1, 2, 3, 4, 5]);
        assert!(pixels.iter().all(|p| p.0 == 2 || p.0 == 3));
    }

    #[test]
    fn offscreen_line_is_clipped() {
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        draw_line(&mut screen, -10, 3, 30, 3, 1);
        assert_eq!(lit(&buf).len(), W);
    }

    #[test]
    fn extreme_endpoints_only_walk_the_screen() {
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        draw_line(&mut screen, i32::MIN, 10, i32::MAX, 10, 1);
        draw_line(&mut screen, 3, i32::MAX, 3, i32::MIN, 2);
        let pixels = lit(&buf);
        assert_eq!(pixels.len(), W + H - 1);
        assert!(pixels.iter().all(|&(x, y)| y == 10 || x == 3));
    }

    /// Draw the same line on a small screen and, shifted, on a larger one;
    /// the small screen must match the matching window of the large one
    fn assert_clip_matches_full_walk(x0: i32, y0: i32, x1: i32, y1: i32) {
        const BIG: usize = 80;
        const OFF: i32 = 32;
        let mut small = vec![0u32; W * H];
        let mut big = vec![0u32; BIG * BIG];
        let mut small_screen = Screen::new(&mut small, W, H).unwrap();
        let mut big_screen = Screen::new(&mut big, BIG, BIG).unwrap();
        draw_line(&mut small_screen, x0, y0, x1, y1, 1);
        draw_line(&mut big_screen, x0 + OFF, y0 + OFF, x1 + OFF, y1 + OFF, 1);

        for y in 0..H as i32 {
            for x in 0..W as i32 {
                assert_eq!(
                    small_screen.get_color(x, y),
                    big_screen.get_color(x + OFF, y + OFF),
                    "pixel ({x}, {y}) of {x0},{y0} -> {x1},{y1}"
                );
            }
        }
    }

    #[test]
    fn clipped_lines_keep_their_pixels() {
        assert_clip_matches_full_walk(-7, -3, 20, 9);
        assert_clip_matches_full_walk(25, 14, -30, 2);
        assert_clip_matches_full_walk(-5, 30, 9, -20);
        assert_clip_matches_full_walk(-20, -1, 30, 0);
    }

    #[test]
    fn barycentric_at_vertices() {
        let tri = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ];
        assert_eq!(barycentric(&tri, Vec2::new(0.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(barycentric(&tri, Vec2::new(4.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(barycentric(&tri, Vec2::new(0.0, 4.0)), Vec3::new(0.0, 0.0, 1.0));
        let outside = barycentric(&tri, Vec2::new(4.0, 4.0));
        assert!(outside.x < 0.0);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let tri = [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(9.0, 9.0, 0.0),
        ];
        let bc = barycentric(&tri, Vec2::new(5.0, 5.0));
        assert!(bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0);

        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        let mut zb = DepthBuffer::new(W, H);
        assert_eq!(draw_triangle(&mut screen, &tri, Some(&mut zb), 1), 0);
        assert!(buf.iter().all(|&p| p == 0));
    }

    #[test]
    fn triangle_fill_stays_inside_screen() {
        let tri = [
            Vec3::new(-20.0, -20.0, 0.0),
            Vec3::new(80.0, -20.0, 0.0),
            Vec3::new(-20.0, 80.0, 0.0),
        ];
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        assert_eq!(draw_triangle(&mut screen, &tri, None, 1), W * H);
    }

    #[test]
    fn nan_vertex_draws_nothing() {
        let tri = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(0.0, 15.0, 0.0),
        ];
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        assert_eq!(draw_triangle(&mut screen, &tri, None, 1), 0);
        assert!(buf.iter().all(|&p| p == 0));
    }

    #[test]
    fn mismatched_depth_buffer_is_refused() {
        let tri = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(15.0, 0.0, 0.0),
            Vec3::new(0.0, 15.0, 0.0),
        ];
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        let mut small = DepthBuffer::new(W / 2, H / 2);
        assert_eq!(draw_triangle(&mut screen, &tri, Some(&mut small), 1), 0);
        assert_eq!(small.depth_at(0, 0), f32::NEG_INFINITY);

        let mut sized = DepthBuffer::for_screen(&screen);
        assert!(draw_triangle(&mut screen, &tri, Some(&mut sized), 1) > 0);
    }

    fn square_pair(near_first: bool) -> u32 {
        let near = rgb(255, 0, 0);
        let far = rgb(0, 0, 255);
        let near_tri = [
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(12.0, 0.0, 0.5),
            Vec3::new(0.0, 12.0, 0.5),
        ];
        let far_tri = [
            Vec3::new(2.0, 2.0, -0.5),
            Vec3::new(14.0, 2.0, -0.5),
            Vec3::new(2.0, 14.0, -0.5),
        ];

        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        let mut zb = DepthBuffer::new(W, H);
        if near_first {
            draw_triangle(&mut screen, &near_tri, Some(&mut zb), near);
            draw_triangle(&mut screen, &far_tri, Some(&mut zb), far);
        } else {
            draw_triangle(&mut screen, &far_tri, Some(&mut zb), far);
            draw_triangle(&mut screen, &near_tri, Some(&mut zb), near);
        }
        screen.get_color(4, 4).unwrap()
    }

    #[test]
    fn depth_test_is_order_independent() {
        assert_eq!(square_pair(true), rgb(255, 0, 0));
        assert_eq!(square_pair(false), rgb(255, 0, 0));
    }

    #[test]
    fn without_depth_last_write_wins() {
        let tri = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(8.0, 0.0, 1.0),
            Vec3::new(0.0, 8.0, 1.0),
        ];
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        draw_triangle(&mut screen, &tri, None, 1);
        draw_triangle(&mut screen, &tri, None, 2);
        assert_eq!(screen.get_color(1, 1), Some(2));
    }

    #[test]
    fn outline_touches_all_corners_but_not_interior() {
        let tri = [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(12.0, 1.0, 0.0),
            Vec3::new(1.0, 12.0, 0.0),
        ];
        let mut buf = vec![0u32; W * H];
        let mut screen = Screen::new(&mut buf, W, H).unwrap();
        draw_triangle_outline(&mut screen, &tri, 1);
        assert_eq!(screen.get_color(1, 1), Some(1));
        assert_eq!(screen.get_color(4, 4), Some(0));
    }
}
