// Copyright 2025. Fixture scenes for rgba-line.
//
// Every fixture draws the same four lines onto a transparent canvas. The
// fixtures differ in rasterizer and in how pixels reach the canvas.

use rgba_line::{bresenham_line, line, Color, CompOp, Composite, Line, PixelBuffer, PointD};

pub const DEFAULT_SIZE: u32 = 64;

/// Stroke color used by every fixture.
pub const COLOR: Color = Color::from_ints(51, 153, 255, 191);

/// The four lines of the scene, in 64x64 canvas coordinates.
pub const LINES: [[f64; 4]; 4] = [
    [8.0, 8.0, 56.0, 56.0],
    [56.0, 8.0, 8.0, 56.0],
    [4.0, 12.0, 60.0, 12.0],
    [4.0, 32.0, 60.0, 32.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Anti-aliased (Wu)
    Line,
    /// Hard-edged (Bresenham)
    Bresenham,
}

impl Algorithm {
    fn draw_fn(self) -> Line {
        match self {
            Algorithm::Line => line,
            Algorithm::Bresenham => bresenham_line,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Algorithm::Line => "line",
            Algorithm::Bresenham => "bresenham",
        }
    }
}

/// Parse a composite mode: `none` disables compositing, anything else is an
/// SVG operation name (`normal` is accepted for `src-over`).
pub fn parse_composite(s: &str) -> Result<Composite, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(Composite::None);
    }
    s.parse::<CompOp>()
        .map(Composite::Blend)
        .map_err(|e| e.to_string())
}

/// Render the four-line scene with one rasterizer and composite mode.
///
/// Line coordinates are scaled from the 64x64 layout to the canvas size.
pub fn render_scene(
    algorithm: Algorithm,
    composite: Composite,
    width: u32,
    height: u32,
) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    let sx = width as f64 / DEFAULT_SIZE as f64;
    let sy = height as f64 / DEFAULT_SIZE as f64;
    let draw = algorithm.draw_fn();
    for [x0, y0, x1, y1] in LINES {
        draw(
            &mut buf,
            PointD::new(x0 * sx, y0 * sy),
            PointD::new(x1 * sx, y1 * sy),
            COLOR,
            composite,
        );
    }
    log::debug!(
        "Rendered {} scene ({:?}) at {}x{}",
        algorithm.name(),
        composite,
        width,
        height
    );
    buf
}

/// The reference fixtures, as `(name, algorithm, composite)`.
pub const FIXTURES: [(&str, Algorithm, Composite); 4] = [
    ("line-composite-normal", Algorithm::Line, Composite::Blend(CompOp::SrcOver)),
    ("line-no-composite", Algorithm::Line, Composite::None),
    ("bresenham-composite-normal", Algorithm::Bresenham, Composite::Blend(CompOp::SrcOver)),
    ("bresenham-no-composite", Algorithm::Bresenham, Composite::None),
];

pub fn available_fixtures() -> impl Iterator<Item = &'static str> {
    FIXTURES.iter().map(|f| f.0)
}

/// Render a named reference fixture at the default size.
pub fn render_fixture(name: &str) -> Option<PixelBuffer> {
    FIXTURES
        .iter()
        .find(|f| f.0 == name)
        .map(|&(_, algorithm, composite)| {
            render_scene(algorithm, composite, DEFAULT_SIZE, DEFAULT_SIZE)
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rgba_line::Rgba8;

    #[test]
    fn test_parse_composite() {
        assert_eq!(parse_composite("none"), Ok(Composite::None));
        assert_eq!(parse_composite("normal"), Ok(Composite::Blend(CompOp::SrcOver)));
        assert_eq!(parse_composite("multiply"), Ok(Composite::Blend(CompOp::Multiply)));
        assert!(parse_composite("sparkle").is_err());
    }

    #[test]
    fn test_fixture_names() {
        let names: Vec<_> = available_fixtures().collect();
        assert_eq!(names.len(), 4);
        assert!(render_fixture("line-no-composite").is_some());
        assert!(render_fixture("lion").is_none());
    }

    #[test]
    fn test_bresenham_no_composite_fixture() {
        let buf = render_fixture("bresenham-no-composite").unwrap();
        let stroke = Rgba8::new(51, 153, 255, 191);
        // diagonals and both horizontals
        for (x, y) in [(8, 8), (56, 56), (56, 8), (8, 56), (4, 12), (60, 12), (4, 32), (60, 32)] {
            assert_eq!(buf.pixel(x, y), Some(stroke), "({}, {})", x, y);
        }
        assert_eq!(buf.pixel(0, 0), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_composite_normal_darkens_overlaps() {
        let normal = render_fixture("bresenham-composite-normal").unwrap();
        let none = render_fixture("bresenham-no-composite").unwrap();
        // (32, 32) is covered by both diagonals and the middle line
        assert!(normal.pixel(32, 32).unwrap().a > none.pixel(32, 32).unwrap().a);
        // a pixel covered once matches in both modes
        assert_eq!(normal.pixel(20, 12), none.pixel(20, 12));
    }

    #[test]
    fn test_scaled_scene() {
        let buf = render_scene(Algorithm::Bresenham, Composite::None, 128, 128);
        assert_eq!(buf.pixel(16, 16).map(|p| p.a), Some(191));
        assert_eq!(buf.pixel(120, 64).map(|p| p.a), Some(191));
    }
}
