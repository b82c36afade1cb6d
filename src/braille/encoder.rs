//! Tile binarization and braille code point composition.

use super::cache::{LocalSymbolCache, SymbolCache};
use crate::grid::{Grid2D, Tile, TILE_LEN};

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Eight binarized tile values, still in tile order.
///
/// Bit `i` holds tile value `i` (see [`Tile`]). This is the cache key: two
/// tiles with the same pattern always produce the same glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitPattern(u8);

impl BitPattern {
    pub fn from_bits(bits: [bool; TILE_LEN]) -> Self {
        let raw = bits
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &on)| acc | (u8::from(on) << i));
        BitPattern(raw)
    }

    pub fn from_raw(raw: u8) -> Self {
        BitPattern(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn bits(self) -> [bool; TILE_LEN] {
        let mut bits = [false; TILE_LEN];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = self.0 & (1 << i) != 0;
        }
        bits
    }

    /// Flip every bit.
    pub fn inverted(self) -> Self {
        BitPattern(!self.0)
    }
}

/// Binarize a tile against `threshold`.
///
/// A value lights its dot when `(value > threshold) XOR invert`. In normal
/// mode a dot is lit when its pixel is strictly brighter than the threshold.
/// In inverted mode it is lit when the pixel is darker or equal.
pub fn binarize(tile: &Tile, threshold: f32, invert: bool) -> BitPattern {
    let mut bits = [false; TILE_LEN];
    for (bit, &value) in bits.iter_mut().zip(tile.values()) {
        *bit = (value > threshold) != invert;
    }
    BitPattern::from_bits(bits)
}

/// Move bits from tile order into dot-number order.
///
/// Tile order is `[d1, d2, d3, d7, d4, d5, d6, d8]`. Three adjacent swaps,
/// applied one after the other on the same array, give
/// `[d1, d2, d3, d4, d5, d6, d7, d8]`. Each swap moves `d7` one place to the
/// right.
pub fn reorder_dots(bits: [bool; TILE_LEN]) -> [bool; TILE_LEN] {
    let mut dots = bits;
    dots.swap(3, 4);
    dots.swap(4, 5);
    dots.swap(5, 6);
    dots
}

/// Compose the braille character for a binarized tile.
///
/// Bit `i` of the offset is dot `i + 1`; the result lies in U+2800..=U+28FF.
pub fn pattern_to_char(pattern: BitPattern) -> char {
    let code = reorder_dots(pattern.bits())
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &on)| acc | (u32::from(on) << i));
    char::from_u32(BRAILLE_BASE as u32 + code).unwrap_or(BRAILLE_BASE)
}

/// Convert a 2x4 boolean grid to a braille character.
///
/// `grid[x][y]` is the dot in column `x`, row `y`. The bit positions are:
/// ```text
/// [0,0]=1   [1,0]=8
/// [0,1]=2   [1,1]=16
/// [0,2]=4   [1,2]=32
/// [0,3]=64  [1,3]=128
/// ```
pub fn dots_to_char(grid: [[bool; 4]; 2]) -> char {
    const WEIGHTS: [[u32; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
    let mut code = 0u32;
    for (column, weights) in grid.iter().zip(WEIGHTS.iter()) {
        for (&on, &weight) in column.iter().zip(weights.iter()) {
            if on {
                code |= weight;
            }
        }
    }
    char::from_u32(BRAILLE_BASE as u32 + code).unwrap_or(BRAILLE_BASE)
}

/// Tile-to-glyph encoder with a memoizing symbol cache.
///
/// The cache only saves work: an encoder built with
/// [`NoCache`](super::NoCache) produces identical output.
#[derive(Debug, Default)]
pub struct BrailleEncoder<C: SymbolCache = LocalSymbolCache> {
    cache: C,
}

impl<C: SymbolCache> BrailleEncoder<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Encode one tile.
    pub fn encode(&mut self, tile: &Tile, threshold: f32, invert: bool) -> char {
        let pattern = binarize(tile, threshold, invert);
        self.cache
            .get_or_insert_with(pattern, || pattern_to_char(pattern))
    }

    /// Encode one tile row into a glyph string, in column order.
    pub fn encode_row(&mut self, tiles: &[Tile], threshold: f32, invert: bool) -> String {
        tiles
            .iter()
            .map(|tile| self.encode(tile, threshold, invert))
            .collect()
    }

    /// Encode every row of a tile grid.
    pub fn encode_grid(
        &mut self,
        tiles: &Grid2D<Tile>,
        threshold: f32,
        invert: bool,
    ) -> Vec<String> {
        tiles
            .iter_rows()
            .map(|row| self.encode_row(row, threshold, invert))
            .collect()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn into_cache(self) -> C {
        self.cache
    }
}
