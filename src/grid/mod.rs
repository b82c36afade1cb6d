//! Two-dimensional grids and the stages that regroup them.
//!
//! Every stage of the pipeline consumes one grid and produces a new one:
//!
//! 1. **Downsampling** - average `factor x factor` blocks ([`downsample`])
//! 2. **Tiling** - regroup into 4x2 braille cells ([`tile`])
//!
//! Both stages go through the same index mapping ([`ChunkLayout`]), so the
//! padding and ordering rules live in exactly one place.

mod downsample;
mod layout;
mod tile;

pub use downsample::downsample;
pub use layout::{low_side_padding, ChunkLayout, IntraOrder};
pub use tile::{tile, Tile, TILE_COLS, TILE_LEN, TILE_ROWS};

use std::ops::Index;

/// Row-major grid of `rows x cols` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid2D<T> {
    /// Wrap a flat row-major buffer.
    ///
    /// Returns `None` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Borrow a single row.
    ///
    /// # Panics
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows, top to bottom.
    ///
    /// Always yields `rows()` slices, empty ones for a zero-column grid.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every value, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid2D<U> {
        Grid2D {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Grid2D<T> {
    /// Swap rows and columns.
    pub fn transpose(&self) -> Self {
        Grid2D::from_fn(self.cols, self.rows, |r, c| self[(c, r)].clone())
    }

    /// Return a copy with the row order reversed.
    pub fn flip_vertical(&self) -> Self {
        Grid2D::from_fn(self.rows, self.cols, |r, c| {
            self[(self.rows - 1 - r, c)].clone()
        })
    }
}

impl<T> Index<(usize, usize)> for Grid2D<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "grid index ({}, {}) out of bounds for {}x{}",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_bad_length() {
        assert!(Grid2D::from_vec(2, 3, vec![0u8; 5]).is_none());
        assert!(Grid2D::from_vec(2, 3, vec![0u8; 6]).is_some());
    }

    #[test]
    fn test_index_is_row_major() {
        let grid = Grid2D::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid[(0, 2)], 3);
        assert_eq!(grid[(1, 0)], 4);
        assert_eq!(grid.row(1), &[4, 5, 6]);
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_transpose() {
        let grid = Grid2D::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let t = grid.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(t.transpose(), grid);
    }

    #[test]
    fn test_flip_vertical() {
        let grid = Grid2D::from_vec(3, 1, vec![1, 2, 3]).unwrap();
        assert_eq!(grid.flip_vertical().as_slice(), &[3, 2, 1]);
    }

    #[test]
    fn test_iter_rows_zero_columns() {
        let grid: Grid2D<u8> = Grid2D::from_vec(3, 0, Vec::new()).unwrap();
        assert_eq!(grid.iter_rows().count(), 3);
        assert!(grid.iter_rows().all(|row| row.is_empty()));
        let grid: Grid2D<u8> = Grid2D::from_vec(0, 0, Vec::new()).unwrap();
        assert_eq!(grid.iter_rows().count(), 0);
        let grid = Grid2D::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(grid.iter_rows().count(), 2);
    }
}
