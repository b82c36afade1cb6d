//! Fixed-layout header blocks of an uncompressed bitmap container.
//!
//! ```text
//! offset  size  field
//!      0     2  magic "BM"
//!      2     4  file size            (informational)
//!      6     4  reserved
//!     10     4  pixel data offset
//!     14     4  info header size     (ignored, assumed 40)
//!     18     4  width                (signed)
//!     22     4  height               (signed, sign = row order)
//!     26     2  planes               (ignored)
//!     28     2  bit depth
//!     30     4  compression
//!     34     4  image size           (0 = compute from dimensions)
//!     38    16  resolution / palette (ignored)
//! ```
//!
//! All fields are little-endian.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{BrailleError, Result};

/// Expected magic bytes.
pub const MAGIC: [u8; 2] = *b"BM";

/// Size of the file header including the magic.
pub const FILE_HEADER_SIZE: u32 = 14;

/// Size of the info block that follows the file header.
pub const INFO_HEADER_SIZE: u32 = 40;

/// Combined size of both header blocks.
pub const HEADERS_SIZE: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// Compression code for uncompressed RGB data.
pub const BI_RGB: u32 = 0;

/// File header fields after the magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
}

impl FileHeader {
    /// Read the 12 bytes following the magic.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let file_size = reader.read_u32::<LittleEndian>().map_err(eof_as("file header"))?;
        let _reserved = reader.read_u32::<LittleEndian>().map_err(eof_as("file header"))?;
        let pixel_offset = reader.read_u32::<LittleEndian>().map_err(eof_as("file header"))?;
        Ok(Self {
            file_size,
            pixel_offset,
        })
    }
}

/// Image metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    pub width: i32,
    pub height: i32,
    pub bit_depth: u16,
    pub compression: u32,
    pub image_size: u32,
}

impl InfoHeader {
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut block = [0u8; INFO_HEADER_SIZE as usize];
        reader.read_exact(&mut block).map_err(eof_as("info header"))?;

        let mut cursor = io::Cursor::new(&block[..]);
        let _header_size = cursor.read_u32::<LittleEndian>()?;
        let width = cursor.read_i32::<LittleEndian>()?;
        let height = cursor.read_i32::<LittleEndian>()?;
        let _planes = cursor.read_u16::<LittleEndian>()?;
        let bit_depth = cursor.read_u16::<LittleEndian>()?;
        let compression = cursor.read_u32::<LittleEndian>()?;
        let image_size = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            width,
            height,
            bit_depth,
            compression,
            image_size,
        })
    }

    /// Rows are stored bottom row first when the height is non-negative.
    pub fn is_bottom_up(&self) -> bool {
        self.height >= 0
    }

    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bit_depth / 8)
    }

    /// Check the depth and compression this decoder can handle.
    pub fn validate(&self) -> Result<()> {
        if self.compression != BI_RGB {
            return Err(BrailleError::UnsupportedCompression(self.compression));
        }
        if self.bit_depth != 24 && self.bit_depth != 32 {
            return Err(BrailleError::UnsupportedDepth(self.bit_depth));
        }
        if self.width <= 0 {
            return Err(BrailleError::Format(format!(
                "invalid width {}",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(BrailleError::Format("image height is zero".to_string()));
        }
        Ok(())
    }

    /// Dimensions as `(width, rows)`, with the orientation sign removed.
    pub fn dimensions(&self) -> (usize, usize) {
        (
            self.width.unsigned_abs() as usize,
            self.height.unsigned_abs() as usize,
        )
    }

    /// Bytes per stored scanline, including alignment padding.
    ///
    /// Scanlines are padded to a multiple of 4 bytes. For 24-bit images this
    /// means padding exactly when the width is not a multiple of 4.
    pub fn stride(&self) -> Option<usize> {
        let (width, _) = self.dimensions();
        let row_bytes = width.checked_mul(self.bytes_per_pixel())?;
        Some(row_bytes.checked_add(3)? & !3)
    }

    /// Bytes of pixel data the container must provide.
    pub fn required_data_size(&self) -> Option<usize> {
        let (_, rows) = self.dimensions();
        self.stride()?.checked_mul(rows)
    }
}

/// Map an unexpected EOF to a truncation error, keeping other I/O errors.
pub(crate) fn eof_as(what: &'static str) -> impl Fn(io::Error) -> BrailleError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            BrailleError::truncated(what)
        } else {
            BrailleError::Io(e)
        }
    }
}
