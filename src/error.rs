//! Error types for the decode and render pipeline.

use std::io;

/// Errors produced by the bitmap decoder and the glyph pipeline.
///
/// Every variant is fatal for the frame that produced it. Whether a caller
/// skips the frame or aborts the stream is decided outside the core (see
/// [`crate::pipeline::FramePolicy`]).
#[derive(Debug, thiserror::Error)]
pub enum BrailleError {
    /// Malformed container: bad magic, truncated stream, or size mismatch.
    #[error("Invalid bitmap: {0}")]
    Format(String),

    #[error("Unsupported bit depth: {0} (expected 24 or 32)")]
    UnsupportedDepth(u16),

    #[error("Unsupported compression method: {0} (only uncompressed bitmaps are supported)")]
    UnsupportedCompression(u32),

    /// A chunk or downsample factor that cannot partition a grid.
    #[error("Invalid chunk size: {0} (must be at least 1)")]
    InvalidChunkSize(usize),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl BrailleError {
    pub(crate) fn truncated(what: &str) -> Self {
        BrailleError::Format(format!("stream ended while reading {}", what))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BrailleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            BrailleError::UnsupportedDepth(8).to_string(),
            "Unsupported bit depth: 8 (expected 24 or 32)"
        );
        assert_eq!(
            BrailleError::InvalidChunkSize(0).to_string(),
            "Invalid chunk size: 0 (must be at least 1)"
        );
        assert_eq!(
            BrailleError::truncated("pixel data").to_string(),
            "Invalid bitmap: stream ended while reading pixel data"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: BrailleError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, BrailleError::Io(_)));
    }
}
