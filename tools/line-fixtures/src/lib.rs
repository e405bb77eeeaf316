// Copyright 2025. Fixture rendering and pixel comparison for rgba-line.
//
// Provides buffer comparison, BMP/raw I/O, and diff image generation.

use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};

use rgba_line::{BufferError, PixelBuffer, Rgba8};
use thiserror::Error;

pub mod render;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("Invalid BMP data: {0}")]
    InvalidBmp(&'static str),
    #[error("Raw file too small: expected {expected} bytes, got {actual}")]
    TruncatedRaw { expected: usize, actual: usize },
    #[error("Unsupported image format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("Image sizes differ: {0}x{1} vs {2}x{3}")]
    SizeMismatch(u32, u32, u32, u32),
}

// ============================================================================
// Comparison Result
// ============================================================================

/// A single pixel difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: Rgba8,
    pub pixel_b: Rgba8,
}

/// Result of comparing two pixel buffers.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub total_pixels: u64,
    /// Pixels that differ by at least 1 in any channel.
    pub different_pixels: u64,
    /// Largest absolute difference of any channel of any pixel.
    pub max_channel_diff: u8,
    /// Mean absolute difference over the differing channels.
    pub mean_channel_diff: f64,
    /// First differing pixel in row-major order.
    pub first_diff: Option<DiffInfo>,
}

impl CompareResult {
    pub fn identical(&self) -> bool {
        self.different_pixels == 0
    }
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical() {
            return write!(f, "IDENTICAL: {} pixels match perfectly", self.total_pixels);
        }
        write!(
            f,
            "DIFFERENT: {}/{} pixels differ ({:.2}%), max_diff={}, mean_diff={:.4}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
            self.mean_channel_diff,
        )?;
        if let Some(ref d) = self.first_diff {
            write!(
                f,
                "\n  First diff at ({}, {}): A={:?} B={:?}",
                d.x, d.y, d.pixel_a, d.pixel_b
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Buffer Comparison
// ============================================================================

fn check_same_size(a: &PixelBuffer, b: &PixelBuffer) -> Result<(), FixtureError> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(FixtureError::SizeMismatch(a.width(), a.height(), b.width(), b.height()));
    }
    Ok(())
}

fn channel_diffs(pa: Rgba8, pb: Rgba8) -> [u8; 4] {
    let (a, b) = (pa.to_bytes(), pb.to_bytes());
    [0, 1, 2, 3].map(|c| a[c].abs_diff(b[c]))
}

/// Compare two buffers pixel by pixel.
pub fn compare_buffers(a: &PixelBuffer, b: &PixelBuffer) -> Result<CompareResult, FixtureError> {
    check_same_size(a, b)?;

    let mut different_pixels = 0u64;
    let mut max_channel_diff = 0u8;
    let mut diff_sum = 0u64;
    let mut diff_channels = 0u64;
    let mut first_diff = None;

    for ((x, y, pa), (_, _, pb)) in a.pixels().zip(b.pixels()) {
        let diffs = channel_diffs(pa, pb);
        if diffs == [0; 4] {
            continue;
        }
        for d in diffs.into_iter().filter(|&d| d > 0) {
            max_channel_diff = max_channel_diff.max(d);
            diff_sum += d as u64;
            diff_channels += 1;
        }
        different_pixels += 1;
        if first_diff.is_none() {
            first_diff = Some(DiffInfo {
                x,
                y,
                pixel_a: pa,
                pixel_b: pb,
            });
        }
    }

    Ok(CompareResult {
        total_pixels: a.width() as u64 * a.height() as u64,
        different_pixels,
        max_channel_diff,
        mean_channel_diff: if diff_channels > 0 {
            diff_sum as f64 / diff_channels as f64
        } else {
            0.0
        },
        first_diff,
    })
}

/// Build a diff image: identical pixels dark gray, differing pixels red with
/// brightness proportional to the largest channel difference (amplified 10x).
pub fn generate_diff_image(a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer, FixtureError> {
    check_same_size(a, b)?;

    let mut diff = PixelBuffer::new(a.width(), a.height());
    for ((x, y, pa), (_, _, pb)) in a.pixels().zip(b.pixels()) {
        let max_diff = channel_diffs(pa, pb).into_iter().max().unwrap_or(0);
        let c = if max_diff == 0 {
            Rgba8::new(40, 40, 40, 255)
        } else {
            Rgba8::new((max_diff as u16 * 10).min(255) as u8, 0, 0, 255)
        };
        diff.copy_pixel(x as i32, y as i32, &c);
    }
    Ok(diff)
}

// ============================================================================
// BMP I/O (32-bit BGRA, top-down)
// ============================================================================

const BMP_HEADER_LEN: u32 = 14 + 40;

/// Encode a buffer as a 32-bit top-down BMP.
pub fn write_bmp<W: IoWrite>(w: &mut W, buf: &PixelBuffer) -> io::Result<()> {
    let image_size = (buf.stride() * buf.height() as usize) as u32;

    // File header
    w.write_all(b"BM")?;
    w.write_all(&(BMP_HEADER_LEN + image_size).to_le_bytes())?;
    w.write_all(&[0u8; 4])?;
    w.write_all(&BMP_HEADER_LEN.to_le_bytes())?;

    // BITMAPINFOHEADER
    w.write_all(&40u32.to_le_bytes())?;
    w.write_all(&buf.width().to_le_bytes())?;
    w.write_all(&(-(buf.height() as i32)).to_le_bytes())?; // top-down
    w.write_all(&1u16.to_le_bytes())?;
    w.write_all(&32u16.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?; // BI_RGB
    w.write_all(&image_size.to_le_bytes())?;
    w.write_all(&[0u8; 16])?;

    let mut row = vec![0u8; buf.stride()];
    for y in 0..buf.height() {
        for (dst, src) in row.chunks_exact_mut(4).zip(buf.row(y).chunks_exact(4)) {
            dst.copy_from_slice(&[src[2], src[1], src[0], src[3]]);
        }
        w.write_all(&row)?;
    }
    Ok(())
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Decode an uncompressed 24- or 32-bit BMP.
pub fn read_bmp(data: &[u8]) -> Result<PixelBuffer, FixtureError> {
    if data.len() < BMP_HEADER_LEN as usize || &data[0..2] != b"BM" {
        return Err(FixtureError::InvalidBmp("missing BM header"));
    }

    let pixel_offset = le_u32(data, 10) as usize;
    let w = le_u32(data, 18) as i32;
    let h = le_u32(data, 22) as i32;
    let bytes_pp = u16::from_le_bytes([data[28], data[29]]) as usize / 8;
    if le_u32(data, 30) != 0 {
        return Err(FixtureError::InvalidBmp("compressed bitmaps are not supported"));
    }
    if bytes_pp != 3 && bytes_pp != 4 {
        return Err(FixtureError::InvalidBmp("only 24 and 32 bit bitmaps are supported"));
    }

    let width = w.unsigned_abs();
    let height = h.unsigned_abs();
    let top_down = h < 0;
    let row_stride = (width as usize)
        .checked_mul(bytes_pp)
        .and_then(|n| n.checked_add(3))
        .map(|n| n / 4 * 4)
        .ok_or(FixtureError::InvalidBmp("dimensions overflow"))?;
    let pixel_end = row_stride
        .checked_mul(height as usize)
        .and_then(|n| n.checked_add(pixel_offset))
        .ok_or(FixtureError::InvalidBmp("dimensions overflow"))?;
    if pixel_end > data.len() {
        return Err(FixtureError::InvalidBmp("pixel data is truncated"));
    }

    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        let src_y = if top_down { y } else { height - 1 - y };
        let row = &data[pixel_offset + src_y as usize * row_stride..];
        for x in 0..width {
            let s = &row[x as usize * bytes_pp..];
            let a = if bytes_pp == 4 { s[3] } else { 255 };
            buf.copy_pixel(x as i32, y as i32, &Rgba8::new(s[2], s[1], s[0], a));
        }
    }
    Ok(buf)
}

// ============================================================================
// Raw RGBA I/O: [width:u32][height:u32][rgba_data]
// ============================================================================

pub fn write_raw<W: IoWrite>(w: &mut W, buf: &PixelBuffer) -> io::Result<()> {
    w.write_all(&buf.width().to_le_bytes())?;
    w.write_all(&buf.height().to_le_bytes())?;
    w.write_all(buf.data())
}

pub fn read_raw(data: &[u8]) -> Result<PixelBuffer, FixtureError> {
    if data.len() < 8 {
        return Err(FixtureError::TruncatedRaw {
            expected: 8,
            actual: data.len(),
        });
    }
    let width = le_u32(data, 0);
    let height = le_u32(data, 4);
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| n.checked_add(8))
        .ok_or(BufferError::TooLarge { width, height })?;
    if data.len() < expected {
        return Err(FixtureError::TruncatedRaw {
            expected,
            actual: data.len(),
        });
    }
    Ok(PixelBuffer::from_vec(width, height, data[8..expected].to_vec())?)
}

// ============================================================================
// Files
// ============================================================================

enum Format {
    Bmp,
    Raw,
}

fn format_of(path: &Path) -> Result<Format, FixtureError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bmp") => Ok(Format::Bmp),
        Some("raw") | Some("rgba") => Ok(Format::Raw),
        _ => Err(FixtureError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load an image file, choosing the format by extension.
pub fn load_image(path: &Path) -> Result<PixelBuffer, FixtureError> {
    let format = format_of(path)?;
    let data = fs::read(path)?;
    log::debug!("Read {} bytes from {}", data.len(), path.display());
    match format {
        Format::Bmp => read_bmp(&data),
        Format::Raw => read_raw(&data),
    }
}

/// Save an image file, choosing the format by extension.
pub fn save_image(path: &Path, buf: &PixelBuffer) -> Result<(), FixtureError> {
    let mut out = Vec::new();
    match format_of(path)? {
        Format::Bmp => write_bmp(&mut out, buf)?,
        Format::Raw => write_raw(&mut out, buf)?,
    }
    fs::write(path, out)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let mut buf = PixelBuffer::new(3, 2);
        buf.copy_pixel(0, 0, &Rgba8::new(1, 2, 3, 4));
        buf.copy_pixel(2, 1, &Rgba8::new(250, 128, 0, 255));
        buf
    }

    #[test]
    fn test_identical_buffers() {
        let a = sample();
        let result = compare_buffers(&a, &a.clone()).unwrap();
        assert!(result.identical());
        assert_eq!(result.total_pixels, 6);
        assert!(result.first_diff.is_none());
        assert!(result.to_string().starts_with("IDENTICAL"));
    }

    #[test]
    fn test_different_buffers() {
        let a = sample();
        let mut b = a.clone();
        b.copy_pixel(1, 0, &Rgba8::new(0, 0, 10, 0));
        b.copy_pixel(2, 1, &Rgba8::new(240, 128, 0, 255));
        let result = compare_buffers(&a, &b).unwrap();
        assert_eq!(result.different_pixels, 2);
        assert_eq!(result.max_channel_diff, 10);
        assert_eq!(result.mean_channel_diff, 10.0);
        let first = result.first_diff.unwrap();
        assert_eq!((first.x, first.y), (1, 0));
    }

    #[test]
    fn test_size_mismatch() {
        let a = PixelBuffer::new(2, 2);
        let b = PixelBuffer::new(2, 3);
        assert!(matches!(compare_buffers(&a, &b), Err(FixtureError::SizeMismatch(2, 2, 2, 3))));
        assert!(generate_diff_image(&a, &b).is_err());
    }

    #[test]
    fn test_diff_image() {
        let a = sample();
        let mut b = a.clone();
        b.copy_pixel(0, 1, &Rgba8::new(0, 3, 0, 0));
        let diff = generate_diff_image(&a, &b).unwrap();
        assert_eq!(diff.pixel(0, 1), Some(Rgba8::new(30, 0, 0, 255)));
        assert_eq!(diff.pixel(1, 1), Some(Rgba8::new(40, 40, 40, 255)));
    }

    #[test]
    fn test_bmp_layout() {
        let mut out = Vec::new();
        write_bmp(&mut out, &sample()).unwrap();
        assert_eq!(out.len(), 54 + 3 * 2 * 4);
        assert_eq!(&out[0..2], b"BM");
        // first pixel stored as BGRA
        assert_eq!(&out[54..58], &[3, 2, 1, 4]);
        assert_eq!(read_bmp(&out).unwrap(), sample());
    }

    #[test]
    fn test_bottom_up_24_bit_bmp() {
        // 1x2 image, bottom row first, rows padded to 4 bytes
        let mut data = Vec::new();
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&(54u32 + 8).to_le_bytes());
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&54u32.to_le_bytes());
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(&2i32.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&24u16.to_le_bytes());
        data.extend_from_slice(&[0; 24]);
        data.extend_from_slice(&[30, 20, 10, 0]); // bottom row
        data.extend_from_slice(&[3, 2, 1, 0]); // top row
        let buf = read_bmp(&data).unwrap();
        assert_eq!(buf.pixel(0, 0), Some(Rgba8::new(1, 2, 3, 255)));
        assert_eq!(buf.pixel(0, 1), Some(Rgba8::new(10, 20, 30, 255)));
    }

    #[test]
    fn test_bad_bmp() {
        assert!(matches!(read_bmp(b"PNG"), Err(FixtureError::InvalidBmp(_))));
        let mut out = Vec::new();
        write_bmp(&mut out, &sample()).unwrap();
        out.truncate(60);
        assert!(matches!(read_bmp(&out), Err(FixtureError::InvalidBmp(_))));
    }

    fn bmp_header(width: i32, height: i32, bpp: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&54u32.to_le_bytes());
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&bpp.to_le_bytes());
        data.extend_from_slice(&[0; 24]);
        data
    }

    #[test]
    fn test_bmp_with_overflowing_dimensions() {
        let data = bmp_header(i32::MIN, i32::MIN, 32);
        assert_eq!(data.len(), 54);
        assert!(matches!(read_bmp(&data), Err(FixtureError::InvalidBmp(_))));

        let data = bmp_header(i32::MAX, 2, 24);
        assert!(matches!(read_bmp(&data), Err(FixtureError::InvalidBmp(_))));
    }

    #[test]
    fn test_raw() {
        let mut out = Vec::new();
        write_raw(&mut out, &sample()).unwrap();
        assert_eq!(&out[0..8], &[3, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(read_raw(&out).unwrap(), sample());
        assert!(matches!(
            read_raw(&out[..10]),
            Err(FixtureError::TruncatedRaw { expected: 32, actual: 10 })
        ));
    }

    #[test]
    fn test_unknown_extension() {
        let path = Path::new("fixture.png");
        assert!(matches!(load_image(path), Err(FixtureError::UnsupportedFormat(_))));
    }
}
