//! Streaming decoder for uncompressed 24/32-bit bitmaps.

use std::io::{self, Read};

use super::header::{eof_as, FileHeader, InfoHeader, HEADERS_SIZE, MAGIC};
use super::luminance::{scanlines_to_luminance, LuminanceBuffer};
use crate::error::{BrailleError, Result};

/// Decodes one or more concatenated bitmap containers from a byte stream.
///
/// Reads block on the underlying reader and have no timeout. To cancel,
/// close or interrupt the stream.
///
/// # Stream position after an error
///
/// - Wrong magic: only the 2 magic bytes have been consumed.
/// - Unsupported depth/compression, or an inconsistent header: the decoder
///   uses the header's file size to skip the rest of the container. When
///   that works, [`is_synchronized`](Self::is_synchronized) is true and the
///   next container can be decoded.
/// - Truncation or I/O failure: the position is unspecified.
pub struct BitmapDecoder<R> {
    reader: R,
    synchronized: bool,
    frames_decoded: usize,
}

impl<R: Read> BitmapDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            synchronized: true,
            frames_decoded: 0,
        }
    }

    /// Decode exactly one container.
    ///
    /// An empty stream is reported as a truncated container.
    pub fn decode(&mut self) -> Result<LuminanceBuffer> {
        self.next_frame()?
            .ok_or_else(|| BrailleError::truncated("magic"))
    }

    /// Decode the next container.
    ///
    /// Returns `Ok(None)` on a clean end of stream at a container boundary.
    pub fn next_frame(&mut self) -> Result<Option<LuminanceBuffer>> {
        let magic = match self.read_magic()? {
            Some(magic) => magic,
            None => return Ok(None),
        };
        self.synchronized = false;

        if magic != MAGIC {
            return Err(BrailleError::Format(format!(
                "bad magic {:02X?}, expected {:02X?}",
                magic, MAGIC
            )));
        }

        let file_header = FileHeader::read_from(&mut self.reader)?;
        let info = InfoHeader::read_from(&mut self.reader)?;
        log::debug!(
            "Bitmap header: {}x{} {}bpp compression={} offset={} image_size={}",
            info.width,
            info.height,
            info.bit_depth,
            info.compression,
            file_header.pixel_offset,
            info.image_size
        );

        let (stride, required) = match check_layout(&file_header, &info) {
            Ok(layout) => layout,
            Err(e) => {
                self.skip_container(&file_header);
                return Err(e);
            }
        };

        // Vendor-specific header extensions sit between the info block and the pixels
        let extra = u64::from(file_header.pixel_offset - HEADERS_SIZE);
        self.discard(extra, "extended header")?;

        let data_size = if info.image_size != 0 {
            info.image_size as usize
        } else {
            required
        };
        let pixels = self.read_pixels(data_size)?;
        self.synchronized = true;

        let (width, rows) = info.dimensions();
        let gray = scanlines_to_luminance(&pixels, width, rows, stride, info.bytes_per_pixel());
        self.frames_decoded += 1;

        LuminanceBuffer::new(gray, width, rows, info.is_bottom_up())
            .ok_or_else(|| {
                BrailleError::Format("pixel data does not match image dimensions".to_string())
            })
            .map(Some)
    }

    /// Iterate over every container left in the stream.
    ///
    /// The iterator ends at a clean end of stream, or right after an I/O
    /// error or any error that leaves the stream unsynchronized.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            decoder: self,
            done: false,
        }
    }

    /// Whether the stream is positioned at a container boundary.
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Number of containers decoded successfully so far.
    pub fn frames_decoded(&self) -> usize {
        self.frames_decoded
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the 2 magic bytes, or `None` if the stream is already exhausted.
    fn read_magic(&mut self) -> Result<Option<[u8; 2]>> {
        let mut magic = [0u8; 2];
        let mut filled = 0;
        while filled < magic.len() {
            match self.reader.read(&mut magic[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.synchronized = false;
                    return Err(e.into());
                }
            }
        }
        match filled {
            0 => Ok(None),
            2 => Ok(Some(magic)),
            _ => {
                self.synchronized = false;
                Err(BrailleError::truncated("magic"))
            }
        }
    }

    fn read_pixels(&mut self, size: usize) -> Result<Vec<u8>> {
        // Grow with the data instead of trusting the declared size for allocation
        let mut pixels = Vec::new();
        (&mut self.reader)
            .take(size as u64)
            .read_to_end(&mut pixels)?;
        if pixels.len() < size {
            return Err(BrailleError::truncated("pixel data"));
        }
        Ok(pixels)
    }

    fn discard(&mut self, count: u64, what: &'static str) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let skipped = io::copy(&mut (&mut self.reader).take(count), &mut io::sink())
            .map_err(eof_as(what))?;
        if skipped < count {
            return Err(BrailleError::truncated(what));
        }
        Ok(())
    }

    /// Skip what remains of a rejected container, using its declared file size.
    fn skip_container(&mut self, file_header: &FileHeader) {
        if file_header.file_size < HEADERS_SIZE {
            log::debug!(
                "Cannot resynchronize: declared file size {} is smaller than the headers",
                file_header.file_size
            );
            return;
        }
        let remaining = u64::from(file_header.file_size - HEADERS_SIZE);
        match self.discard(remaining, "rejected container") {
            Ok(()) => self.synchronized = true,
            Err(e) => log::debug!("Cannot resynchronize after rejected container: {}", e),
        }
    }
}

/// Validate the headers and return `(stride, required pixel bytes)`.
fn check_layout(file_header: &FileHeader, info: &InfoHeader) -> Result<(usize, usize)> {
    info.validate()?;

    if file_header.pixel_offset < HEADERS_SIZE {
        return Err(BrailleError::Format(format!(
            "pixel data offset {} points inside the headers",
            file_header.pixel_offset
        )));
    }

    let overflow = || BrailleError::Format("image dimensions overflow".to_string());
    let stride = info.stride().ok_or_else(overflow)?;
    let required = info.required_data_size().ok_or_else(overflow)?;

    if info.image_size != 0 && (info.image_size as usize) < required {
        return Err(BrailleError::Format(format!(
            "declared image size {} is smaller than the {} bytes needed for {}x{}",
            info.image_size,
            required,
            info.width,
            info.height.unsigned_abs()
        )));
    }

    Ok((stride, required))
}

/// Iterator over the containers of a stream, see [`BitmapDecoder::frames`].
pub struct Frames<'a, R> {
    decoder: &'a mut BitmapDecoder<R>,
    done: bool,
}

impl<R: Read> Iterator for Frames<'_, R> {
    type Item = Result<LuminanceBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.next_frame() {
            Ok(Some(buffer)) => Some(Ok(buffer)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // A failing reader would fail again
                if !self.decoder.is_synchronized() || matches!(e, BrailleError::Io(_)) {
                    self.done = true;
                }
                Some(Err(e))
            }
        }
    }
}
