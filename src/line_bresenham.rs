//! Hard-edged line rasterization (Bresenham).
//!
//! Endpoints are truncated toward zero and the line is walked with the
//! integer error-accumulator form of Bresenham's algorithm, one pixel per
//! step, each at full source alpha.

use crate::basics::{PointD, PointI};
use crate::color::Color;
use crate::comp_op::Composite;
use crate::pixel_writer::{PixelWriter, Plot};
use crate::rendering_buffer::PixelBuffer;

// ============================================================================
// Bresenham line interpolator
// ============================================================================

/// Iterator over the pixels of an integer Bresenham line, both endpoints
/// included.
///
/// Arithmetic is carried in `i64` so the doubled error term cannot overflow
/// for any pair of `i32` endpoints.
#[derive(Debug, Clone)]
pub struct LineBresenhamInterpolator {
    x: i64,
    y: i64,
    x_end: i64,
    y_end: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    started: bool,
    done: bool,
}

impl LineBresenhamInterpolator {
    pub fn new(from: PointI, to: PointI) -> Self {
        let (x0, y0) = (from.x as i64, from.y as i64);
        let (x1, y1) = (to.x as i64, to.y as i64);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        Self {
            x: x0,
            y: y0,
            x_end: x1,
            y_end: y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx - dy,
            started: false,
            done: false,
        }
    }

    /// Number of pixels the line visits, endpoints included.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.dx.max(self.dy) as u64 + 1
    }

    /// Advance one step toward the end point.
    #[inline]
    fn step(&mut self) {
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
    }
}

impl Iterator for LineBresenhamInterpolator {
    type Item = PointI;

    fn next(&mut self) -> Option<PointI> {
        if self.done {
            return None;
        }
        if self.started {
            self.step();
        } else {
            self.started = true;
        }
        if self.x == self.x_end && self.y == self.y_end {
            self.done = true;
        }
        // Every visited coordinate lies between two i32 endpoints.
        Some(PointI::new(self.x as i32, self.y as i32))
    }
}

// ============================================================================
// Rasterization
// ============================================================================

/// Emit the Bresenham pixels for `from`–`to` into `plot`, each with coverage 1.
///
/// Endpoints are truncated toward zero. Identical endpoints yield the single
/// start pixel.
pub fn rasterize_bresenham<P: Plot>(from: PointD, to: PointD, plot: &mut P) {
    if !from.is_finite() || !to.is_finite() {
        log::warn!("Refusing to draw line with non-finite endpoints {:?} -> {:?}", from, to);
        return;
    }
    let li = LineBresenhamInterpolator::new(from.truncate(), to.truncate());
    log::trace!("Bresenham line {:?} -> {:?}, {} pixels", from, to, li.len());
    for p in li {
        plot.plot(p.x, p.y, 1.0);
    }
}

/// Draw a hard-edged line from `from` to `to` into `dest`.
///
/// Every pixel gets the full source alpha. Pixels outside the buffer are
/// dropped, so endpoints may lie anywhere.
pub fn bresenham_line(
    dest: &mut PixelBuffer,
    from: PointD,
    to: PointD,
    color: Color,
    composite: Composite,
) {
    let mut writer = PixelWriter::new(dest, color, composite);
    rasterize_bresenham(from, to, &mut writer);
}

// ============================================================================
// Tests
// ============================================================================
