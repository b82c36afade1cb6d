//! Uncompressed bitmap decoding.
//!
//! Turns a byte stream of one or more concatenated bitmap containers into
//! [`LuminanceBuffer`]s:
//!
//! 1. **Headers** - fixed little-endian file and info blocks ([`header`])
//! 2. **Scanlines** - per-row alignment padding is stripped
//! 3. **Luminance** - BGR(A) pixels become BT.601 grayscale
//!
//! Only 24- and 32-bit uncompressed data is supported. Row order is recorded
//! in [`LuminanceBuffer::is_bottom_up`] and never changed by the decoder.

mod decoder;
pub mod header;
mod luminance;

#[cfg(test)]
pub(crate) mod test_support;

pub use decoder::{BitmapDecoder, Frames};
pub use header::{FileHeader, InfoHeader};
pub use luminance::{luminance, scanlines_to_luminance, LuminanceBuffer};
