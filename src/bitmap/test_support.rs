//! In-memory bitmap fixtures for unit tests.

use super::header::{FILE_HEADER_SIZE, HEADERS_SIZE, INFO_HEADER_SIZE};

/// Builds a gray bitmap container byte by byte.
pub(crate) struct BmpBuilder {
    width: usize,
    height: usize,
    samples: Vec<u8>,
    top_down: bool,
    depth: u16,
    compression: u32,
    image_size: Option<u32>,
    extra_header: u32,
    trailing: usize,
}

impl BmpBuilder {
    /// `samples` are gray values in stored row order.
    pub(crate) fn gray(width: usize, height: usize, samples: &[u8]) -> Self {
        assert_eq!(samples.len(), width * height);
        Self {
            width,
            height,
            samples: samples.to_vec(),
            top_down: false,
            depth: 24,
            compression: 0,
            image_size: None,
            extra_header: 0,
            trailing: 0,
        }
    }

    pub(crate) fn top_down(mut self) -> Self {
        self.top_down = true;
        self
    }

    pub(crate) fn depth(mut self, depth: u16) -> Self {
        self.depth = depth;
        self
    }

    pub(crate) fn compression(mut self, compression: u32) -> Self {
        self.compression = compression;
        self
    }

    pub(crate) fn image_size(mut self, size: u32) -> Self {
        self.image_size = Some(size);
        self
    }

    /// Extra bytes between the info block and the pixel data.
    pub(crate) fn extra_header(mut self, bytes: u32) -> Self {
        self.extra_header = bytes;
        self
    }

    /// Zero bytes appended after the padded pixel rows.
    pub(crate) fn trailing_bytes(mut self, bytes: usize) -> Self {
        self.trailing = bytes;
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let bpp = usize::from(self.depth / 8).max(1);
        let stride = (self.width * bpp + 3) & !3;

        let mut pixels = Vec::with_capacity(stride * self.height + self.trailing);
        for row in self.samples.chunks(self.width.max(1)) {
            let start = pixels.len();
            for &gray in row {
                pixels.extend(std::iter::repeat(gray).take(bpp.min(3)));
                if bpp == 4 {
                    pixels.push(0xFF);
                }
            }
            pixels.resize(start + stride, 0);
        }
        pixels.resize(pixels.len() + self.trailing, 0);

        let offset = HEADERS_SIZE + self.extra_header;
        let file_size = offset + pixels.len() as u32;
        let height = if self.top_down {
            -(self.height as i32)
        } else {
            self.height as i32
        };

        let mut out = Vec::with_capacity(file_size as usize);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.depth.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.unwrap_or(0).to_le_bytes());
        out.extend_from_slice(&[0u8; 16]);
        debug_assert_eq!(out.len(), (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as usize);
        out.resize(offset as usize, 0);
        out.extend_from_slice(&pixels);
        out
    }
}
