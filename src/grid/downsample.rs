//! Block-averaging downsampler.

use super::layout::{ChunkLayout, IntraOrder};
use super::Grid2D;
use crate::error::Result;

/// Reduce a grid by averaging `factor x factor` blocks.
///
/// Each output cell is the arithmetic mean of its block. When a dimension is
/// not divisible by `factor`, the grid is zero-padded on the top/left side
/// first, and padded cells count as luminance 0 in the mean. Blocks on the
/// top and left edges therefore come out darker than their real pixels. This
/// is known behavior.
///
/// The output has `ceil(rows / factor) x ceil(cols / factor)` cells and
/// depends only on the grid contents and `factor`.
///
/// # Errors
/// [`crate::BrailleError::InvalidChunkSize`] if `factor` is zero.
///
/// # Example
/// ```
/// use braille_render::grid::{downsample, Grid2D};
///
/// let grid = Grid2D::from_vec(2, 2, vec![0u8, 100, 200, 100]).unwrap();
/// let reduced = downsample(&grid, 2).unwrap();
/// assert_eq!(reduced.as_slice(), &[100.0]);
/// ```
pub fn downsample<T>(grid: &Grid2D<T>, factor: usize) -> Result<Grid2D<f32>>
where
    T: Copy + Into<f32>,
{
    let layout = ChunkLayout::new(grid.rows(), grid.cols(), factor, factor, IntraOrder::RowMajor)?;
    let area = layout.chunk_len() as f64;

    let reduced = Grid2D::from_fn(layout.out_rows(), layout.out_cols(), |r, c| {
        // Padding cells contribute nothing to the sum but still count in `area`
        let sum: f64 = (0..layout.chunk_len())
            .filter_map(|i| layout.source(r, c, i))
            .map(|(sr, sc)| f64::from(grid[(sr, sc)].into()))
            .sum();
        (sum / area) as f32
    });

    log::debug!(
        "Downsampled {}x{} -> {}x{} (factor {})",
        grid.rows(),
        grid.cols(),
        reduced.rows(),
        reduced.cols(),
        factor
    );

    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrailleError;

    #[test]
    fn test_factor_zero_rejected() {
        let grid = Grid2D::from_vec(1, 1, vec![10u8]).unwrap();
        assert!(matches!(
            downsample(&grid, 0),
            Err(BrailleError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn test_factor_one_is_identity() {
        let values: Vec<u8> = (0..35).map(|i| (i * 7) as u8).collect();
        let grid = Grid2D::from_vec(5, 7, values.clone()).unwrap();
        let out = downsample(&grid, 1).unwrap();
        assert_eq!((out.rows(), out.cols()), (5, 7));
        let expected: Vec<f32> = values.iter().map(|&v| v as f32).collect();
        assert_eq!(out.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_exact_blocks() {
        #[rustfmt::skip]
        let grid = Grid2D::from_vec(2, 4, vec![
            10u8, 20, 100, 100,
            30,   40, 200, 200,
        ]).unwrap();
        let out = downsample(&grid, 2).unwrap();
        assert_eq!((out.rows(), out.cols()), (1, 2));
        assert_eq!(out.as_slice(), &[25.0, 150.0]);
    }

    #[test]
    fn test_padding_darkens_top_left_edge() {
        // 3x3 of 90 with factor 2 pads one row on top and one column on the left
        let grid = Grid2D::from_vec(3, 3, vec![90u8; 9]).unwrap();
        let out = downsample(&grid, 2).unwrap();
        assert_eq!((out.rows(), out.cols()), (2, 2));
        // top-left block: 1 real pixel of 4
        assert_eq!(out[(0, 0)], 22.5);
        // top-right and bottom-left: 2 real pixels of 4
        assert_eq!(out[(0, 1)], 45.0);
        assert_eq!(out[(1, 0)], 45.0);
        // bottom-right block is fully inside the image
        assert_eq!(out[(1, 1)], 90.0);
    }

    #[test]
    fn test_accepts_float_grid() {
        let grid = Grid2D::from_vec(1, 2, vec![1.0f32, 2.0]).unwrap();
        let out = downsample(&grid, 2).unwrap();
        // one padded row on top: (0 + 0 + 1 + 2) / 4
        assert_eq!(out.as_slice(), &[0.75]);
    }

    #[test]
    fn test_empty_grid() {
        let grid: Grid2D<u8> = Grid2D::from_vec(0, 0, Vec::new()).unwrap();
        let out = downsample(&grid, 3).unwrap();
        assert!(out.is_empty());
    }
}
