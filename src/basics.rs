//! Foundation types and the fixed-point helpers shared by the rasterizers.
//!
//! The anti-aliased line splits every sample into an integer pixel index and
//! a fractional coverage weight. The helpers here pin down exactly how that
//! split happens, including for negative coordinates, where truncation and
//! flooring disagree.

// ============================================================================
// Truncation
// ============================================================================

/// Truncate toward zero, keeping the sign.
///
/// This is the coercion applied to color channels and to Bresenham endpoints.
/// It differs from `floor` for negative values: `to_int(-1.5) == -1`.
/// NaN maps to 0 and values outside the `i32` range saturate.
#[inline]
pub fn to_int(v: f64) -> i32 {
    v as i32
}

/// Round a non-negative double to the nearest unsigned integer (round half up).
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

// ============================================================================
// Fixed-point helpers (anti-aliased path)
// ============================================================================

/// Integer part of `v`, truncated toward zero.
///
/// `integer_part(-1.5) == -1.0`, whereas `floor(-1.5) == -2.0`.
#[inline]
pub fn integer_part(v: f64) -> f64 {
    let sign = if v < 0.0 { -1.0 } else { 1.0 };
    v.abs().floor() * sign
}

/// Fractional part of `v`, always reported as a non-negative value.
///
/// For `v >= 0` this is `v - floor(v)`. For negative `v` it is
/// `1 - (v - floor(v))`, which does not line up with [`integer_part`].
/// The Wu rasterizer depends on both behaving exactly like this.
#[inline]
pub fn fraction(v: f64) -> f64 {
    if v < 0.0 {
        return 1.0 - (v - v.floor());
    }
    v - v.floor()
}

/// `1 - fraction(v)`.
#[inline]
pub fn reverse_fraction(v: f64) -> f64 {
    1.0 - fraction(v)
}

/// Round half up through [`integer_part`].
#[inline]
pub fn round(v: f64) -> f64 {
    integer_part(v + 0.5)
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

pub type PointI = PointBase<i32>;
pub type PointD = PointBase<f64>;

impl PointD {
    /// Both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Truncate both coordinates toward zero.
    #[inline]
    pub fn truncate(&self) -> PointI {
        PointI::new(to_int(self.x), to_int(self.y))
    }
}

impl From<(f64, f64)> for PointD {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================
