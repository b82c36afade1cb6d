//! Shared fixtures for integration tests.

#![allow(dead_code)]

/// Encode gray samples (stored row order) as an uncompressed bitmap container.
///
/// Each gray value is written as B = G = R, so decoding yields the same value.
pub fn gray_bmp(
    width: usize,
    height: usize,
    samples: &[u8],
    top_down: bool,
    depth: u16,
) -> Vec<u8> {
    assert_eq!(samples.len(), width * height);
    let bpp = usize::from(depth / 8);
    let stride = (width * bpp + 3) & !3;

    let mut pixels = Vec::with_capacity(stride * height);
    for row in samples.chunks(width) {
        let start = pixels.len();
        for &gray in row {
            pixels.extend_from_slice(&[gray, gray, gray]);
            if bpp == 4 {
                pixels.push(0xFF);
            }
        }
        pixels.resize(start + stride, 0);
    }

    let offset: u32 = 54;
    let file_size = offset + pixels.len() as u32;
    let signed_height = if top_down {
        -(height as i32)
    } else {
        height as i32
    };

    let mut out = Vec::with_capacity(file_size as usize);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&signed_height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&depth.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);
    out.extend_from_slice(&pixels);
    out
}

/// Deterministic pseudo-random gray samples.
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}
