//! Binary PPM (P6) frame dump

use renderer::screen::channels;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write the visible part of a strided `0x00RRGGBB` buffer as P6.
///
/// Buffer rows are already top-down, so they are emitted in order.
pub fn write_ppm<W: Write>(
    out: &mut W,
    pixels: &[u32],
    width: usize,
    height: usize,
    stride: usize,
) -> io::Result<()> {
    if stride < width || stride.checked_mul(height).is_none_or(|n| pixels.len() < n) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} pixels cannot hold {width}x{height} at stride {stride}", pixels.len()),
        ));
    }

    write!(out, "P6\n{width} {height}\n255\n")?;
    let mut row_bytes = Vec::with_capacity(width * 3);
    for row in pixels.chunks(stride).take(height) {
        row_bytes.clear();
        for &pixel in &row[..width] {
            let (r, g, b) = channels(pixel);
            row_bytes.extend_from_slice(&[r, g, b]);
        }
        out.write_all(&row_bytes)?;
    }
    Ok(())
}

/// Write a frame to a file at `path`
pub fn save_ppm(
    path: impl AsRef<Path>,
    pixels: &[u32],
    width: usize,
    height: usize,
    stride: usize,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(&mut out, pixels, width, height, stride)?;
    out.flush()
}
