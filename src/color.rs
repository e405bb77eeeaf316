//! Color types.
//!
//! [`Rgba8`] is what lives in the pixel buffer: four straight (not
//! premultiplied) 8-bit channels. [`Color`] is what callers draw with: channel
//! values truncated toward zero but otherwise left alone, so an out-of-range
//! channel is carried through rather than clamped.

use crate::basics::{to_int, uround};

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components, in R, G, B, A memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;

    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read a pixel from the first four bytes of `p`.
    #[inline]
    pub fn from_slice(p: &[u8]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    /// Write the pixel into the first four bytes of `p`.
    #[inline]
    pub fn write_to(&self, p: &mut [u8]) {
        p[..4].copy_from_slice(&self.to_bytes());
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Pack into a native-endian word whose byte view is R, G, B, A.
    ///
    /// On little-endian hosts this is `0xAABBGGRR`, on big-endian hosts
    /// `0xRRGGBBAA`.
    #[inline]
    pub fn pack(&self) -> u32 {
        u32::from_ne_bytes(self.to_bytes())
    }

    /// Inverse of [`pack`](Self::pack).
    #[inline]
    pub fn unpack(v: u32) -> Self {
        let [r, g, b, a] = v.to_ne_bytes();
        Self::new(r, g, b, a)
    }

    pub fn to_double(a: u8) -> f64 {
        a as f64 / Self::BASE_MASK as f64
    }

    /// Convert a [0, 1] value back to a channel; values outside are clamped.
    pub fn from_double(a: f64) -> u8 {
        uround(a.clamp(0.0, 1.0) * Self::BASE_MASK as f64) as u8
    }
}

// ============================================================================
// Color (source color as supplied by the caller)
// ============================================================================

/// Source color for a line.
///
/// Channels are integers produced by truncating the caller's values toward
/// zero. They are expected to lie in 0..=255 but are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Color {
    /// Build a color from arbitrary numeric channels, truncating each one.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: to_int(r),
            g: to_int(g),
            b: to_int(b),
            a: to_int(a),
        }
    }

    pub const fn from_ints(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    /// The low 8 bits of a channel, the way a 32-bit shift-and-or pack sees it.
    #[inline]
    pub fn channel_byte(v: i32) -> u8 {
        v as u8
    }

    /// Destination bytes for an unblended write with alpha scaled to `alpha`.
    ///
    /// `alpha` is truncated toward zero before taking its low byte.
    #[inline]
    pub fn to_rgba8_with_alpha(&self, alpha: f64) -> Rgba8 {
        Rgba8::new(
            Self::channel_byte(self.r),
            Self::channel_byte(self.g),
            Self::channel_byte(self.b),
            Self::channel_byte(to_int(alpha)),
        )
    }

    /// Channel value as a [0, 1] double, clamped. Used by the blenders.
    #[inline]
    pub fn unit(v: i32) -> f64 {
        (v as f64 / Rgba8::BASE_MASK as f64).clamp(0.0, 1.0)
    }
}

impl From<Rgba8> for Color {
    fn from(c: Rgba8) -> Self {
        Self::from_ints(c.r as i32, c.g as i32, c.b as i32, c.a as i32)
    }
}

// ============================================================================
// Tests
// ============================================================================
