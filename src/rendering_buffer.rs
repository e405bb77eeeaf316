//! Rendering buffer: the RGBA8 pixel grid lines are drawn into.
//!
//! [`PixelBuffer`] owns a row-major byte array with 4 bytes per pixel in
//! R, G, B, A order and no row padding. It never reallocates after
//! construction, and its length always equals `width * height * 4`.

use thiserror::Error;

use crate::color::Rgba8;

/// Bytes per pixel.
pub const BPP: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer of {width}x{height} pixels needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Buffer dimensions {width}x{height} overflow the address space")]
    TooLarge { width: u32, height: u32 },
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// A width × height RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a buffer with every channel of every pixel set to zero.
    ///
    /// Panics if `width * height * 4` overflows `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        let len = Self::byte_len(width, height)
            .unwrap_or_else(|| panic!("buffer {}x{} is too large", width, height));
        Self {
            width,
            height,
            data: vec![0u8; len],
        }
    }

    /// Adopt an existing byte array.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        let expected =
            Self::byte_len(width, height).ok_or(BufferError::TooLarge { width, height })?;
        if data.len() != expected {
            return Err(BufferError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BPP)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give the byte array back to the caller.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// True if `(x, y)` addresses a pixel of this buffer.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Byte offset of the pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BPP)
    }

    /// Immutable slice for row `y`. Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = y as usize * self.stride();
        &self.data[start..start + self.stride()]
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.offset(x, y)
            .map(|off| Rgba8::from_slice(&self.data[off..off + BPP]))
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn copy_pixel(&mut self, x: i32, y: i32, c: &Rgba8) {
        if let Some(off) = self.offset(x, y) {
            c.write_to(&mut self.data[off..off + BPP]);
        }
    }

    /// Native-endian packed word of the pixel at `(x, y)`.
    #[inline]
    pub fn packed(&self, x: i32, y: i32) -> Option<u32> {
        self.pixel(x, y).map(|c| c.pack())
    }

    /// Store a native-endian packed word at `(x, y)`. Out-of-bounds writes are
    /// ignored.
    #[inline]
    pub fn set_packed(&mut self, x: i32, y: i32, v: u32) {
        if let Some(off) = self.offset(x, y) {
            self.data[off..off + BPP].copy_from_slice(&v.to_ne_bytes());
        }
    }

    /// Fill the whole buffer with one color.
    pub fn clear(&mut self, c: &Rgba8) {
        let bytes = c.to_bytes();
        for p in self.data.chunks_exact_mut(BPP) {
            p.copy_from_slice(&bytes);
        }
    }

    /// Iterate over `(x, y, pixel)` for every pixel, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        let w = self.width.max(1);
        self.data
            .chunks_exact(BPP)
            .enumerate()
            .map(move |(i, p)| (i as u32 % w, i as u32 / w, Rgba8::from_slice(p)))
    }
}

// ============================================================================
// Tests
// ============================================================================
