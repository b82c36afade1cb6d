//! braille-render library crate.
//!
//! Renders uncompressed bitmaps as grids of Unicode braille glyphs, one glyph
//! per 2x4 pixel cell:
//!
//! ```text
//! bytes -> BitmapDecoder -> LuminanceBuffer -> downsample -> tile -> BrailleEncoder -> rows
//! ```
//!
//! Printing, font rendering and video muxing are left to the caller; the
//! library hands back glyph rows only.

pub mod bitmap;
pub mod braille;
pub mod config;
pub mod error;
pub mod grid;
pub mod pipeline;

pub use bitmap::{BitmapDecoder, LuminanceBuffer};
pub use error::{BrailleError, Result};
pub use pipeline::{
    render_parallel, FramePolicy, GlyphFrame, RenderOptions, Renderer, StreamSummary, Threshold,
};
