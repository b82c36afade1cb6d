//! Regrouping of a luminance grid into braille-sized tiles.

use super::layout::{ChunkLayout, IntraOrder};
use super::Grid2D;

/// Rows covered by one braille cell.
pub const TILE_ROWS: usize = 4;
/// Columns covered by one braille cell.
pub const TILE_COLS: usize = 2;
/// Values per tile.
pub const TILE_LEN: usize = TILE_ROWS * TILE_COLS;

/// Eight luminance values that become one braille glyph.
///
/// Values are stored column by column: indices 0..4 are the left column top
/// to bottom, indices 4..8 the right column top to bottom. The encoder's
/// dot permutation depends on this order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tile(pub [f32; TILE_LEN]);

impl Tile {
    /// Build a tile from its left and right columns (top to bottom).
    pub fn from_columns(left: [f32; TILE_ROWS], right: [f32; TILE_ROWS]) -> Self {
        let mut values = [0.0; TILE_LEN];
        values[..TILE_ROWS].copy_from_slice(&left);
        values[TILE_ROWS..].copy_from_slice(&right);
        Tile(values)
    }

    /// A tile with every value set to `value`.
    pub fn uniform(value: f32) -> Self {
        Tile([value; TILE_LEN])
    }

    pub fn values(&self) -> &[f32; TILE_LEN] {
        &self.0
    }
}

/// Group a grid into 4-row x 2-column tiles, one per output glyph.
///
/// No averaging happens here. Edges are zero-padded on the top/left side
/// exactly like [`super::downsample`], independently per dimension. The
/// result is `ceil(rows / 4) x ceil(cols / 2)` tiles.
pub fn tile<T>(grid: &Grid2D<T>) -> Grid2D<Tile>
where
    T: Copy + Into<f32>,
{
    let layout = ChunkLayout::with_nonzero_chunks(
        grid.rows(),
        grid.cols(),
        TILE_ROWS,
        TILE_COLS,
        IntraOrder::ColumnMajor,
    );

    Grid2D::from_fn(layout.out_rows(), layout.out_cols(), |r, c| {
        let mut values = [0.0f32; TILE_LEN];
        for (i, value) in values.iter_mut().enumerate() {
            if let Some((sr, sc)) = layout.source(r, c, i) {
                *value = grid[(sr, sc)].into();
            }
        }
        Tile(values)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tile_column_major() {
        #[rustfmt::skip]
        let grid = Grid2D::from_vec(4, 2, vec![
            1u8, 5,
            2,   6,
            3,   7,
            4,   8,
        ]).unwrap();
        let tiles = tile(&grid);
        assert_eq!((tiles.rows(), tiles.cols()), (1, 1));
        assert_eq!(
            tiles[(0, 0)].values(),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn test_dimensions_round_up() {
        for (rows, cols, expect) in [
            (4, 2, (1, 1)),
            (5, 2, (2, 1)),
            (8, 3, (2, 2)),
            (1, 1, (1, 1)),
            (12, 10, (3, 5)),
        ] {
            let grid = Grid2D::from_vec(rows, cols, vec![0u8; rows * cols]).unwrap();
            let tiles = tile(&grid);
            assert_eq!((tiles.rows(), tiles.cols()), expect, "{}x{}", rows, cols);
        }
    }

    #[test]
    fn test_padding_on_low_side() {
        // 1x1 grid: 3 padding rows above, 1 padding column to the left
        let grid = Grid2D::from_vec(1, 1, vec![200u8]).unwrap();
        let tiles = tile(&grid);
        assert_eq!(
            tiles[(0, 0)].values(),
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 200.0]
        );
    }

    #[test]
    fn test_second_tile_row() {
        let grid = Grid2D::from_fn(8, 2, |r, c| (r * 10 + c) as u8);
        let tiles = tile(&grid);
        assert_eq!(
            tiles[(1, 0)].values(),
            &[40.0, 50.0, 60.0, 70.0, 41.0, 51.0, 61.0, 71.0]
        );
    }

    #[test]
    fn test_from_columns() {
        let t = Tile::from_columns([1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]);
        assert_eq!(t.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }
}
