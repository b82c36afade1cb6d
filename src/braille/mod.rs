//! Braille glyph encoding.
//!
//! Each braille character represents a 2x4 dot matrix, so one glyph carries
//! the eight values of a [`Tile`](crate::grid::Tile). Encoding happens in
//! three steps:
//!
//! 1. **Binarize** - compare each value against a threshold ([`binarize`])
//! 2. **Reorder** - move tile order into dot-number order ([`reorder_dots`])
//! 3. **Offset** - add the bits to U+2800 ([`pattern_to_char`])
//!
//! [`BrailleEncoder`] runs all three and memoizes the result per
//! [`BitPattern`] through a [`SymbolCache`].

mod cache;
mod encoder;

pub use cache::{CacheStats, LocalSymbolCache, NoCache, SharedSymbolCache, SymbolCache};
pub use encoder::{
    binarize, dots_to_char, pattern_to_char, reorder_dots, BitPattern, BrailleEncoder,
    BRAILLE_BASE,
};
