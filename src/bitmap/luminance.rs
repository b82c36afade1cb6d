//! Luminance buffers and BGR(A) to grayscale conversion.

use crate::grid::Grid2D;

/// Grayscale samples of one decoded frame.
///
/// Samples are stored in the order the rows appeared in the container. For a
/// bottom-up source the first row is the visually lowest one; see
/// [`LuminanceBuffer::to_top_down`].
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceBuffer {
    grid: Grid2D<u8>,
    bottom_up: bool,
}

impl LuminanceBuffer {
    /// Wrap `samples` as a `width x height` buffer.
    ///
    /// Returns `None` if `samples.len() != width * height`.
    pub fn new(samples: Vec<u8>, width: usize, height: usize, bottom_up: bool) -> Option<Self> {
        let grid = Grid2D::from_vec(height, width, samples)?;
        Some(Self { grid, bottom_up })
    }

    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    pub fn height(&self) -> usize {
        self.grid.rows()
    }

    pub fn is_bottom_up(&self) -> bool {
        self.bottom_up
    }

    pub fn samples(&self) -> &[u8] {
        self.grid.as_slice()
    }

    /// Row-major view of the samples.
    pub fn as_grid(&self) -> &Grid2D<u8> {
        &self.grid
    }

    /// Mean luminance over the full-resolution buffer, or 0 when empty.
    pub fn mean(&self) -> f32 {
        let samples = self.samples();
        if samples.is_empty() {
            return 0.0;
        }
        let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
        (sum as f64 / samples.len() as f64) as f32
    }

    /// Copy with rows in visual top-to-bottom order.
    ///
    /// The decoder never reorders rows itself. Renderers that need upright
    /// output call this.
    pub fn to_top_down(&self) -> Self {
        if !self.bottom_up {
            return self.clone();
        }
        Self {
            grid: self.grid.flip_vertical(),
            bottom_up: false,
        }
    }
}

/// ITU-R BT.601 luminance of one pixel.
///
/// Uses integer math with coefficients scaled by 1000:
/// `Y = (299 R + 587 G + 114 B) / 1000`.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    y as u8
}

/// Convert stored scanlines to grayscale, dropping per-row padding.
///
/// `pixels` holds `rows` scanlines of `stride` bytes each. Every pixel is
/// `bytes_per_pixel` bytes in B, G, R(, A) order, and the alpha byte is
/// ignored. Bytes past `width * bytes_per_pixel` in a scanline are alignment
/// padding.
///
/// # Panics
/// Panics if `bytes_per_pixel` is zero, or if one of the first `rows`
/// scanlines in `pixels` is shorter than `width * bytes_per_pixel` bytes.
/// The decoder checks the data size against the stride before calling this.
pub fn scanlines_to_luminance(
    pixels: &[u8],
    width: usize,
    rows: usize,
    stride: usize,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let row_bytes = width * bytes_per_pixel;
    let mut gray = Vec::with_capacity(width * rows);

    for scanline in pixels.chunks(stride).take(rows) {
        for px in scanline[..row_bytes].chunks_exact(bytes_per_pixel) {
            gray.push(luminance(px[2], px[1], px[0]));
        }
    }

    gray
}
