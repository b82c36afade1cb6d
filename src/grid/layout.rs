//! Index mapping shared by the downsampler and the cell tiler.
//!
//! A grid of `rows x cols` is split into chunks of `chunk_rows x chunk_cols`.
//! When a dimension is not a multiple of its chunk size, the missing cells
//! are added on the low-index side (top rows / left columns) and read as
//! zero. Padding is computed per dimension, independently.
//!
//! ```text
//! rows = 5, chunk_rows = 4  ->  pad_top = 3, out_rows = 2
//!
//!   padded row:  0  1  2 | 3  4  5  6  7
//!   input row:   -  -  - | 0  1  2  3  4
//!   out row:     0  0  0   0 | 1  1  1  1
//! ```

use crate::error::{BrailleError, Result};

/// Order in which the cells of one chunk are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntraOrder {
    /// Left to right, then top to bottom.
    RowMajor,
    /// Top to bottom within column 0, then column 1, and so on.
    ColumnMajor,
}

/// Number of padding cells needed in front of `len` to reach a multiple of `chunk`.
///
/// `chunk` must be non-zero.
pub fn low_side_padding(len: usize, chunk: usize) -> usize {
    (chunk - len % chunk) % chunk
}

/// Partition of a grid into equally sized chunks with low-side zero padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    rows: usize,
    cols: usize,
    chunk_rows: usize,
    chunk_cols: usize,
    pad_top: usize,
    pad_left: usize,
    order: IntraOrder,
}

impl ChunkLayout {
    /// Describe how a `rows x cols` grid splits into `chunk_rows x chunk_cols` chunks.
    ///
    /// Fails with [`BrailleError::InvalidChunkSize`] if either chunk dimension is zero.
    pub fn new(
        rows: usize,
        cols: usize,
        chunk_rows: usize,
        chunk_cols: usize,
        order: IntraOrder,
    ) -> Result<Self> {
        if chunk_rows == 0 {
            return Err(BrailleError::InvalidChunkSize(chunk_rows));
        }
        if chunk_cols == 0 {
            return Err(BrailleError::InvalidChunkSize(chunk_cols));
        }
        Ok(Self::with_nonzero_chunks(rows, cols, chunk_rows, chunk_cols, order))
    }

    /// Same as [`ChunkLayout::new`] for chunk sizes known to be non-zero.
    pub(crate) fn with_nonzero_chunks(
        rows: usize,
        cols: usize,
        chunk_rows: usize,
        chunk_cols: usize,
        order: IntraOrder,
    ) -> Self {
        debug_assert!(chunk_rows > 0 && chunk_cols > 0);
        Self {
            rows,
            cols,
            chunk_rows,
            chunk_cols,
            pad_top: low_side_padding(rows, chunk_rows),
            pad_left: low_side_padding(cols, chunk_cols),
            order,
        }
    }

    /// Number of chunk rows, i.e. `ceil(rows / chunk_rows)`.
    pub fn out_rows(&self) -> usize {
        (self.rows + self.pad_top) / self.chunk_rows
    }

    /// Number of chunk columns, i.e. `ceil(cols / chunk_cols)`.
    pub fn out_cols(&self) -> usize {
        (self.cols + self.pad_left) / self.chunk_cols
    }

    /// Number of cells in one chunk.
    pub fn chunk_len(&self) -> usize {
        self.chunk_rows * self.chunk_cols
    }

    pub fn pad_top(&self) -> usize {
        self.pad_top
    }

    pub fn pad_left(&self) -> usize {
        self.pad_left
    }

    /// Map `(out_row, out_col, intra)` to the input coordinate it reads.
    ///
    /// Returns `None` when the cell lies in the padding (or outside the layout);
    /// callers treat such cells as zero.
    pub fn source(&self, out_row: usize, out_col: usize, intra: usize) -> Option<(usize, usize)> {
        if out_row >= self.out_rows() || out_col >= self.out_cols() || intra >= self.chunk_len() {
            return None;
        }

        let (dr, dc) = match self.order {
            IntraOrder::RowMajor => (intra / self.chunk_cols, intra % self.chunk_cols),
            IntraOrder::ColumnMajor => (intra % self.chunk_rows, intra / self.chunk_rows),
        };

        let row = (out_row * self.chunk_rows + dr).checked_sub(self.pad_top)?;
        let col = (out_col * self.chunk_cols + dc).checked_sub(self.pad_left)?;
        Some((row, col))
    }
}
