//! Anti-aliased line rasterization (Xiaolin Wu).
//!
//! Every scan step along the major axis touches two pixels stacked across
//! the minor axis. Their coverage weights are the reverse fraction and the
//! fraction of the ideal line's minor coordinate, so each interior column
//! receives a total weight of exactly 1. Endpoint columns are additionally
//! weighted by how much of the pixel the segment spans along the major axis.

use crate::basics::{fraction, integer_part, reverse_fraction, round, PointD};
use crate::color::Color;
use crate::comp_op::Composite;
use crate::pixel_writer::{PixelWriter, Plot};
use crate::rendering_buffer::PixelBuffer;

/// Plot a sample, transposing back to buffer axes for steep lines.
#[inline]
fn plot_oriented<P: Plot>(plot: &mut P, steep: bool, major: i32, minor: i32, coverage: f64) {
    if steep {
        plot.plot(minor, major, coverage);
    } else {
        plot.plot(major, minor, coverage);
    }
}

/// Emit the Wu samples for the segment `from`–`to` into `plot`.
///
/// Identical endpoints produce no samples. The samples do not depend on the
/// direction the segment is given in.
pub fn rasterize_aa<P: Plot>(from: PointD, to: PointD, plot: &mut P) {
    if from == to {
        log::debug!("Skipping degenerate line at ({}, {})", from.x, from.y);
        return;
    }
    if !from.is_finite() || !to.is_finite() {
        log::warn!("Refusing to draw line with non-finite endpoints {:?} -> {:?}", from, to);
        return;
    }

    let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, to.x, to.y);

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let gradient = (y1 - y0) / (x1 - x0);

    // First endpoint
    let x_end = round(x0);
    let y_end = y0 + gradient * (x_end - x0);
    let x_gap = reverse_fraction(x0 + 0.5);
    let x_px1 = x_end as i32;
    let y_px1 = integer_part(y_end) as i32;
    plot_oriented(plot, steep, x_px1, y_px1, reverse_fraction(y_end) * x_gap);
    plot_oriented(plot, steep, x_px1, y_px1.saturating_add(1), fraction(y_end) * x_gap);

    let mut intery = y_end + gradient;

    // Last endpoint
    let x_end = round(x1);
    let y_end = y1 + gradient * (x_end - x1);
    let x_gap = fraction(x1 + 0.5);
    let x_px2 = x_end as i32;
    let y_px2 = integer_part(y_end) as i32;
    plot_oriented(plot, steep, x_px2, y_px2, reverse_fraction(y_end) * x_gap);
    plot_oriented(plot, steep, x_px2, y_px2.saturating_add(1), fraction(y_end) * x_gap);

    log::trace!(
        "Wu line columns {}..={} (steep={}, gradient={})",
        x_px1,
        x_px2,
        steep,
        gradient
    );

    // Interior span
    for x in x_px1.saturating_add(1)..x_px2 {
        let y = integer_part(intery) as i32;
        plot_oriented(plot, steep, x, y, reverse_fraction(intery));
        plot_oriented(plot, steep, x, y.saturating_add(1), fraction(intery));
        intery += gradient;
    }
}

/// Draw an anti-aliased line from `from` to `to` into `dest`.
///
/// Coordinates keep their sub-pixel position. Each sample's alpha is
/// `color.a * coverage`. Samples outside the buffer are skipped.
pub fn line(dest: &mut PixelBuffer, from: PointD, to: PointD, color: Color, composite: Composite) {
    let mut writer = PixelWriter::new(dest, color, composite);
    rasterize_aa(from, to, &mut writer);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use std::collections::BTreeMap;

    fn samples(from: (f64, f64), to: (f64, f64)) -> Vec<(i32, i32, f64)> {
        let mut out = Vec::new();
        rasterize_aa(from.into(), to.into(), &mut |x: i32, y: i32, c: f64| out.push((x, y, c)));
        out
    }

    /// Sum coverage per pixel, for order-independent comparison.
    fn coverage_map(s: &[(i32, i32, f64)]) -> BTreeMap<(i32, i32), f64> {
        let mut map = BTreeMap::new();
        for &(x, y, c) in s {
            *map.entry((x, y)).or_insert(0.0) += c;
        }
        map
    }

    #[test]
    fn test_degenerate_line_emits_nothing() {
        assert!(samples((5.0, 5.0), (5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_non_finite_emits_nothing() {
        assert!(samples((f64::NAN, 0.0), (5.0, 5.0)).is_empty());
        assert!(samples((0.0, 0.0), (f64::INFINITY, 5.0)).is_empty());
    }

    #[test]
    fn test_horizontal_line_coverage() {
        let s = samples((4.0, 12.0), (60.0, 12.0));
        // two endpoint pairs plus two per interior column
        assert_eq!(s.len(), 4 + 2 * 55);
        for &(x, y, c) in &s {
            assert!(y == 12 || y == 13, "sample at ({}, {})", x, y);
            if y == 13 {
                assert_eq!(c, 0.0);
            }
            if y == 12 && x > 4 && x < 60 {
                assert_eq!(c, 1.0);
            }
        }
        let map = coverage_map(&s);
        assert_eq!(map[&(4, 12)], 0.5);
        assert_eq!(map[&(60, 12)], 0.5);
    }

    #[test]
    fn test_interior_columns_sum_to_one() {
        let s = samples((2.3, 7.1), (40.8, 19.6));
        // interior samples come in pairs after the four endpoint samples
        for pair in s[4..].chunks(2) {
            assert_eq!(pair[0].0, pair[1].0);
            assert_eq!(pair[0].1 + 1, pair[1].1);
            assert!((pair[0].2 + pair[1].2 - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_steep_line_is_transposed() {
        let s = samples((10.0, 2.0), (12.0, 30.0));
        // steep: interior pairs share a row and sit in adjacent columns
        for pair in s[4..].chunks(2) {
            assert_eq!(pair[0].1, pair[1].1);
            assert_eq!(pair[0].0 + 1, pair[1].0);
            assert!((pair[0].2 + pair[1].2 - 1.0).abs() < 1e-9);
        }
        let rows: Vec<i32> = s[4..].iter().step_by(2).map(|p| p.1).collect();
        assert_eq!(rows, (3..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_direction_independent() {
        for &(a, b) in &[
            ((8.0, 8.0), (56.0, 56.0)),
            ((56.0, 8.0), (8.0, 56.0)),
            ((1.25, 3.75), (20.5, 9.1)),
            ((3.0, 1.0), (7.5, 33.3)),
            ((-4.2, -1.1), (9.9, 2.7)),
        ] {
            assert_eq!(samples(a, b), samples(b, a), "{:?} -> {:?}", a, b);
        }
    }

    #[test]
    fn test_diagonal_gradient_is_one() {
        let s = samples((8.0, 8.0), (56.0, 56.0));
        for &(x, y, c) in &s[4..] {
            if c > 0.0 {
                assert_eq!(x, y);
                assert_eq!(c, 1.0);
            }
        }
    }

    #[test]
    fn test_line_writes_buffer() {
        let mut buf = PixelBuffer::new(64, 64);
        let color = Color::from_ints(51, 153, 255, 191);
        line(
            &mut buf,
            PointD::new(4.0, 12.0),
            PointD::new(60.0, 12.0),
            color,
            Composite::None,
        );
        assert_eq!(buf.pixel(30, 12), Some(Rgba8::new(51, 153, 255, 191)));
        // half coverage at the endpoints: trunc(191 * 0.5) = 95
        assert_eq!(buf.pixel(4, 12), Some(Rgba8::new(51, 153, 255, 95)));
        assert_eq!(buf.pixel(30, 13).map(|p| p.a), Some(0));
        assert_eq!(buf.pixel(30, 11), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_line_clips_to_buffer() {
        let mut buf = PixelBuffer::new(8, 8);
        let white = Color::from_ints(255, 255, 255, 255);
        line(
            &mut buf,
            PointD::new(-10.0, 3.0),
            PointD::new(20.0, 3.0),
            white,
            Composite::None,
        );
        for x in 0..8 {
            assert_eq!(buf.pixel(x, 3), Some(Rgba8::new(255, 255, 255, 255)));
            // zero coverage below still stores the color with alpha 0
            assert_eq!(buf.pixel(x, 4), Some(Rgba8::new(255, 255, 255, 0)));
        }
        for (x, y, p) in buf.pixels() {
            if y != 3 && y != 4 {
                assert_eq!(p, Rgba8::TRANSPARENT, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_negative_y_uses_truncation_and_mirrored_fraction() {
        // integer_part(-1.25) = -1 while fraction(-1.25) = 0.25
        let s = samples((0.0, -1.25), (4.0, -1.25));
        assert_eq!(
            s,
            vec![
                (0, -1, 0.375),
                (0, 0, 0.125),
                (4, -1, 0.375),
                (4, 0, 0.125),
                (1, -1, 0.75),
                (1, 0, 0.25),
                (2, -1, 0.75),
                (2, 0, 0.25),
                (3, -1, 0.75),
                (3, 0, 0.25),
            ]
        );
    }

    fn assert_samples_near(actual: &[(i32, i32, f64)], expected: &[(i32, i32, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert_eq!((a.0, a.1), (e.0, e.1), "{:?}", actual);
            assert!((a.2 - e.2).abs() < 1e-9, "{:?} vs {:?}", a, e);
        }
    }

    #[test]
    fn test_fractional_start_x() {
        // round(2.3) = 2, gap = reverse_fraction(2.8) = 0.2
        let s = samples((2.3, 5.0), (6.0, 5.0));
        assert_samples_near(
            &s,
            &[
                (2, 5, 0.2),
                (2, 6, 0.0),
                (6, 5, 0.5),
                (6, 6, 0.0),
                (3, 5, 1.0),
                (3, 6, 0.0),
                (4, 5, 1.0),
                (4, 6, 0.0),
                (5, 5, 1.0),
                (5, 6, 0.0),
            ],
        );

        // round(2.7) = 3, gap = reverse_fraction(3.2) = 0.8
        let s = samples((2.7, 5.0), (5.0, 5.0));
        assert_samples_near(
            &s,
            &[
                (3, 5, 0.8),
                (3, 6, 0.0),
                (5, 5, 0.5),
                (5, 6, 0.0),
                (4, 5, 1.0),
                (4, 6, 0.0),
            ],
        );
    }

    #[test]
    fn test_negative_start_x_rounds_toward_zero() {
        // round(-1.7) = integer_part(-1.2) = -1, not -2
        let s = samples((-1.7, 3.0), (2.0, 3.0));
        assert_samples_near(
            &s,
            &[
                (-1, 3, 0.8),
                (-1, 4, 0.0),
                (2, 3, 0.5),
                (2, 4, 0.0),
                (0, 3, 1.0),
                (0, 4, 0.0),
                (1, 3, 1.0),
                (1, 4, 0.0),
            ],
        );
    }
}
