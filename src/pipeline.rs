//! Frame rendering sessions: decode -> downsample -> tile -> encode.
//!
//! Each frame is processed synchronously on the calling thread. Streams of
//! frames go through [`Renderer::render_stream`]. Independent frames can be
//! spread over worker threads with [`render_parallel`].

use std::fmt;
use std::io::Read;
use std::thread;

use crate::bitmap::{BitmapDecoder, LuminanceBuffer};
use crate::braille::{BrailleEncoder, CacheStats, LocalSymbolCache, SharedSymbolCache, SymbolCache};
use crate::error::{BrailleError, Result};
use crate::grid::{downsample, tile};

/// Default downsample factor.
pub const DEFAULT_FACTOR: usize = 2;

/// Where the binarization threshold comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// A fixed luminance value.
    Fixed(f32),
    /// Mean luminance of each frame, taken at full resolution before downsampling.
    FrameMean,
}

impl Threshold {
    /// Resolve the threshold for `frame`.
    pub fn resolve(&self, frame: &LuminanceBuffer) -> f32 {
        match *self {
            Threshold::Fixed(value) => value,
            Threshold::FrameMean => frame.mean(),
        }
    }
}

/// Parameters shared by every frame of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Block size for averaging; must be at least 1.
    pub factor: usize,
    pub threshold: Threshold,
    /// Light dots for dark pixels instead of bright ones.
    pub invert: bool,
    /// Flip bottom-up frames to visual order before rendering.
    pub top_down: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            factor: DEFAULT_FACTOR,
            threshold: Threshold::FrameMean,
            invert: false,
            top_down: false,
        }
    }
}

impl RenderOptions {
    /// Reject configurations that cannot render any frame.
    ///
    /// Runs before any decoding work starts.
    pub fn validate(&self) -> Result<()> {
        if self.factor == 0 {
            return Err(BrailleError::InvalidChunkSize(self.factor));
        }
        Ok(())
    }
}

/// Glyph rows produced from one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphFrame {
    /// One string per tile row, top to bottom in stored order.
    pub rows: Vec<String>,
    /// Orientation of the rows, as stored in the source.
    pub bottom_up: bool,
    pub source_width: usize,
    pub source_height: usize,
}

impl GlyphFrame {
    /// Glyphs per row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.chars().count())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Display for GlyphFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

/// What to do when a frame in a stream cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    /// Return the first error.
    #[default]
    Abort,
    /// Log the error and continue with the next frame, as long as the stream
    /// is still positioned at a container boundary.
    Skip,
}

/// Counters for a rendered stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamStats {
    pub rendered: usize,
    pub skipped: usize,
}

/// Rendered frames of a stream plus its counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub frames: Vec<GlyphFrame>,
    pub skipped: usize,
}

/// An encoding session: validated options plus the session's symbol cache.
#[derive(Debug)]
pub struct Renderer<C: SymbolCache = LocalSymbolCache> {
    options: RenderOptions,
    encoder: BrailleEncoder<C>,
}

impl Renderer<LocalSymbolCache> {
    /// Start a session with a cache confined to this renderer.
    pub fn new(options: RenderOptions) -> Result<Self> {
        Self::with_cache(options, LocalSymbolCache::new())
    }
}

impl<C: SymbolCache> Renderer<C> {
    /// Start a session with a caller-provided cache.
    pub fn with_cache(options: RenderOptions, cache: C) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            encoder: BrailleEncoder::new(cache),
        })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.encoder.cache().stats()
    }

    /// Render one decoded frame.
    pub fn render_frame(&mut self, frame: &LuminanceBuffer) -> Result<GlyphFrame> {
        let upright;
        let frame = if self.options.top_down && frame.is_bottom_up() {
            upright = frame.to_top_down();
            &upright
        } else {
            frame
        };

        let threshold = self.options.threshold.resolve(frame);
        let reduced = downsample(frame.as_grid(), self.options.factor)?;
        let tiles = tile(&reduced);
        let rows = self
            .encoder
            .encode_grid(&tiles, threshold, self.options.invert);

        log::debug!(
            "Rendered {}x{} frame into {}x{} glyphs (threshold {:.1})",
            frame.width(),
            frame.height(),
            tiles.cols(),
            tiles.rows(),
            threshold
        );

        Ok(GlyphFrame {
            rows,
            bottom_up: frame.is_bottom_up(),
            source_width: frame.width(),
            source_height: frame.height(),
        })
    }

    /// Decode and render every container in `reader`, handing each frame to `sink`.
    ///
    /// With [`FramePolicy::Skip`], a frame that fails to decode is logged and
    /// skipped as long as the decoder is still at a container boundary.
    /// Truncation and I/O errors always end the stream. Errors returned by
    /// `sink` are propagated unchanged.
    pub fn render_stream_with<R, F>(
        &mut self,
        reader: R,
        policy: FramePolicy,
        mut sink: F,
    ) -> Result<StreamStats>
    where
        R: Read,
        F: FnMut(GlyphFrame) -> Result<()>,
    {
        let mut decoder = BitmapDecoder::new(reader);
        let mut stats = StreamStats::default();
        let mut index = 0usize;

        loop {
            let frame = match decoder.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e)
                    if policy == FramePolicy::Skip
                        && decoder.is_synchronized()
                        && is_skippable(&e) =>
                {
                    log::warn!("Skipping frame {}: {}", index, e);
                    stats.skipped += 1;
                    index += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            sink(self.render_frame(&frame)?)?;
            stats.rendered += 1;
            index += 1;
        }

        let cache = self.cache_stats();
        log::info!(
            "Stream finished: {} frame(s) rendered, {} skipped, cache {} hit(s) / {} miss(es)",
            stats.rendered,
            stats.skipped,
            cache.hits,
            cache.misses
        );
        Ok(stats)
    }

    /// Decode and render every container in `reader`, collecting the frames.
    pub fn render_stream<R: Read>(
        &mut self,
        reader: R,
        policy: FramePolicy,
    ) -> Result<StreamSummary> {
        let mut frames = Vec::new();
        let stats = self.render_stream_with(reader, policy, |frame| {
            frames.push(frame);
            Ok(())
        })?;
        Ok(StreamSummary {
            frames,
            skipped: stats.skipped,
        })
    }
}

/// Errors that may be skipped when the decoder is still synchronized.
///
/// I/O failures are never skipped: a failing reader would fail again.
fn is_skippable(error: &BrailleError) -> bool {
    !matches!(error, BrailleError::Io(_))
}

/// Render independent frames on `workers` threads.
///
/// Every worker owns its frames' intermediate grids. The only shared state
/// is a lock-guarded [`SharedSymbolCache`]. The output keeps the input order.
pub fn render_parallel(
    frames: &[LuminanceBuffer],
    options: &RenderOptions,
    workers: usize,
) -> Result<Vec<GlyphFrame>> {
    options.validate()?;
    if frames.is_empty() {
        return Ok(Vec::new());
    }

    let workers = workers.clamp(1, frames.len());
    let per_worker = frames.len().div_ceil(workers);
    let cache = SharedSymbolCache::new();

    let results: Vec<Result<Vec<GlyphFrame>>> = thread::scope(|scope| {
        let handles: Vec<_> = frames
            .chunks(per_worker)
            .map(|batch| {
                let cache = cache.clone();
                let options = options.clone();
                scope.spawn(move || -> Result<Vec<GlyphFrame>> {
                    let mut renderer = Renderer::with_cache(options, cache)?;
                    batch.iter().map(|frame| renderer.render_frame(frame)).collect()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let stats = cache.stats();
    log::debug!(
        "Parallel render of {} frame(s) on {} worker(s): cache {} hit(s) / {} miss(es)",
        frames.len(),
        workers,
        stats.hits,
        stats.misses
    );

    let mut rendered = Vec::with_capacity(frames.len());
    for batch in results {
        rendered.extend(batch?);
    }
    Ok(rendered)
}
