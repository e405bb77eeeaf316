//! # rgba-line
//!
//! Straight-line rasterization into in-memory RGBA8 pixel buffers.
//!
//! Two draw modes share one signature ([`Line`]):
//!
//! - [`line`]: anti-aliased, Xiaolin Wu's algorithm, sub-pixel endpoints
//! - [`bresenham_line`]: hard-edged, Bresenham's algorithm, truncated endpoints
//!
//! Each touched pixel either overwrites the destination ([`Composite::None`])
//! or is blended onto it with one of the SVG compositing operations
//! ([`Composite::Blend`], `src-over` by default).
//!
//! ## Architecture
//!
//! 1. **Rasterizer**: [`rasterize_aa`] / [`rasterize_bresenham`] walk the
//!    segment and emit `(x, y, coverage)` samples
//! 2. **Sink**: any [`Plot`] implementation; [`PixelWriter`] clips to the
//!    buffer and performs the write or blend
//! 3. **Buffer**: [`PixelBuffer`], row-major RGBA8 owned by the caller
//!
//! ```
//! use rgba_line::{bresenham_line, line, Color, Composite, PixelBuffer, PointD};
//!
//! let mut buf = PixelBuffer::new(64, 64);
//! let blue = Color::new(51.0, 153.0, 255.0, 191.0);
//! line(&mut buf, PointD::new(4.0, 12.0), PointD::new(60.0, 12.0), blue, Composite::default());
//! bresenham_line(&mut buf, PointD::new(8.0, 8.0), PointD::new(56.0, 56.0), blue, Composite::None);
//! assert_eq!(buf.pixel(20, 20).map(|p| p.a), Some(191));
//! ```

pub mod basics;
pub mod color;
pub mod comp_op;
pub mod line_aa;
pub mod line_bresenham;
pub mod pixel_writer;
pub mod rendering_buffer;

pub use basics::{PointD, PointI};
pub use color::{Color, Rgba8};
pub use comp_op::{CompOp, Composite};
pub use line_aa::{line, rasterize_aa};
pub use line_bresenham::{bresenham_line, rasterize_bresenham, LineBresenhamInterpolator};
pub use pixel_writer::{PixelWriter, Plot};
pub use rendering_buffer::{BufferError, PixelBuffer};

/// Common signature of [`line`] and [`bresenham_line`].
pub type Line = fn(&mut PixelBuffer, PointD, PointD, Color, Composite);
