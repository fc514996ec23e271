//! Software renderer library
//!
//! Rasterizes triangle meshes into a borrowed pixel buffer: Bresenham lines,
//! barycentric triangle fill with an optional z-buffer, and flat shading.

#![no_std]

extern crate alloc;

pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod rasterizer;
pub mod screen;
pub mod shading;
pub mod zbuffer;

pub use mesh::{DecodeError, MeshDecoder, Model, ObjDecoder};
pub use pipeline::{RenderStats, draw_flat, draw_wireframe};
pub use rasterizer::{barycentric, draw_line, draw_triangle};
pub use screen::{Screen, rgb, set_color};
pub use zbuffer::DepthBuffer;
