//! Per-pixel write path shared by both line rasterizers.
//!
//! Rasterizers emit `(x, y, coverage)` samples into a [`Plot`] sink.
//! [`PixelWriter`] is the sink that turns samples into buffer writes: it
//! clips to the buffer, scales the source alpha by coverage, and either
//! stores the packed color directly or blends it through a [`CompOp`].
//!
//! [`CompOp`]: crate::comp_op::CompOp

use crate::color::Color;
use crate::comp_op::{composite_rgba, Composite};
use crate::rendering_buffer::PixelBuffer;

// ============================================================================
// Plot: sample sink
// ============================================================================

/// Receives the pixel samples produced by a rasterizer.
///
/// Coordinates may lie outside any particular buffer; implementations decide
/// whether to clip. `coverage` is in [0, 1], and is always 1 for the
/// Bresenham rasterizer.
pub trait Plot {
    fn plot(&mut self, x: i32, y: i32, coverage: f64);
}

impl<F: FnMut(i32, i32, f64)> Plot for F {
    #[inline]
    fn plot(&mut self, x: i32, y: i32, coverage: f64) {
        self(x, y, coverage)
    }
}

// ============================================================================
// PixelWriter
// ============================================================================

/// Writes line samples of one color into a [`PixelBuffer`].
pub struct PixelWriter<'a> {
    buf: &'a mut PixelBuffer,
    color: Color,
    composite: Composite,
}

impl<'a> PixelWriter<'a> {
    pub fn new(buf: &'a mut PixelBuffer, color: Color, composite: Composite) -> Self {
        Self {
            buf,
            color,
            composite,
        }
    }

    /// Write one pixel with the source alpha replaced by `alpha`
    /// (0..=255 scale, possibly fractional).
    ///
    /// Out-of-bounds coordinates are skipped.
    pub fn write(&mut self, x: i32, y: i32, alpha: f64) {
        let Some(dst) = self.buf.pixel(x, y) else {
            log::trace!(
                "Skipping pixel ({}, {}) outside {}x{} buffer",
                x,
                y,
                self.buf.width(),
                self.buf.height()
            );
            return;
        };
        let v = match self.composite {
            Composite::None => self.color.to_rgba8_with_alpha(alpha).pack(),
            Composite::Blend(op) => composite_rgba(dst, &self.color, alpha, op).pack(),
        };
        self.buf.set_packed(x, y, v);
    }
}

impl Plot for PixelWriter<'_> {
    #[inline]
    fn plot(&mut self, x: i32, y: i32, coverage: f64) {
        let alpha = self.color.a as f64 * coverage;
        self.write(x, y, alpha);
    }
}

// ============================================================================
// Tests
// ============================================================================
