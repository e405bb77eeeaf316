//! SVG compositing operations.
//!
//! Provides the 25 SVG compositing modes (the standard 24 plus `minus`) and
//! [`Composite`], the per-call choice between blending through one of them and
//! overwriting the destination outright.
//!
//! Buffer pixels are straight (non-premultiplied) RGBA8. Blending happens in a
//! premultiplied f64 working space: the destination and the source are
//! premultiplied, combined with the SVG formula, then divided back out.
//! Source alpha arrives as an f64 on the 0..=255 scale because the
//! anti-aliased rasterizer scales it by fractional coverage.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::color::{Color, Rgba8};

// ============================================================================
// CompOp enum: 25 SVG compositing modes
// ============================================================================

/// SVG compositing operation.
///
/// Each variant selects one alpha-compositing formula of the SVG Compositing
/// draft. `SrcOver` is the "normal" mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CompOp {
    Clear = 0,
    Src = 1,
    Dst = 2,
    #[default]
    SrcOver = 3,
    DstOver = 4,
    SrcIn = 5,
    DstIn = 6,
    SrcOut = 7,
    DstOut = 8,
    SrcAtop = 9,
    DstAtop = 10,
    Xor = 11,
    Plus = 12,
    Minus = 13,
    Multiply = 14,
    Screen = 15,
    Overlay = 16,
    Darken = 17,
    Lighten = 18,
    ColorDodge = 19,
    ColorBurn = 20,
    HardLight = 21,
    SoftLight = 22,
    Difference = 23,
    Exclusion = 24,
}

impl CompOp {
    pub const ALL: [CompOp; 25] = [
        CompOp::Clear,
        CompOp::Src,
        CompOp::Dst,
        CompOp::SrcOver,
        CompOp::DstOver,
        CompOp::SrcIn,
        CompOp::DstIn,
        CompOp::SrcOut,
        CompOp::DstOut,
        CompOp::SrcAtop,
        CompOp::DstAtop,
        CompOp::Xor,
        CompOp::Plus,
        CompOp::Minus,
        CompOp::Multiply,
        CompOp::Screen,
        CompOp::Overlay,
        CompOp::Darken,
        CompOp::Lighten,
        CompOp::ColorDodge,
        CompOp::ColorBurn,
        CompOp::HardLight,
        CompOp::SoftLight,
        CompOp::Difference,
        CompOp::Exclusion,
    ];

    /// SVG name of the operation (`"src-over"`, `"color-dodge"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            CompOp::Clear => "clear",
            CompOp::Src => "src",
            CompOp::Dst => "dst",
            CompOp::SrcOver => "src-over",
            CompOp::DstOver => "dst-over",
            CompOp::SrcIn => "src-in",
            CompOp::DstIn => "dst-in",
            CompOp::SrcOut => "src-out",
            CompOp::DstOut => "dst-out",
            CompOp::SrcAtop => "src-atop",
            CompOp::DstAtop => "dst-atop",
            CompOp::Xor => "xor",
            CompOp::Plus => "plus",
            CompOp::Minus => "minus",
            CompOp::Multiply => "multiply",
            CompOp::Screen => "screen",
            CompOp::Overlay => "overlay",
            CompOp::Darken => "darken",
            CompOp::Lighten => "lighten",
            CompOp::ColorDodge => "color-dodge",
            CompOp::ColorBurn => "color-burn",
            CompOp::HardLight => "hard-light",
            CompOp::SoftLight => "soft-light",
            CompOp::Difference => "difference",
            CompOp::Exclusion => "exclusion",
        }
    }

    /// True if a fully transparent source leaves the destination untouched.
    fn ignores_transparent_source(self) -> bool {
        !matches!(
            self,
            CompOp::Clear
                | CompOp::Src
                | CompOp::SrcIn
                | CompOp::DstIn
                | CompOp::SrcOut
                | CompOp::DstAtop
        )
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown compositing operation: {0:?}")]
pub struct UnknownCompOp(pub String);

impl FromStr for CompOp {
    type Err = UnknownCompOp;

    /// Accepts the SVG names plus `"normal"` as an alias for `src-over`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("normal") {
            return Ok(CompOp::SrcOver);
        }
        CompOp::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCompOp(s.to_string()))
    }
}

// ============================================================================
// Composite: blend or overwrite
// ============================================================================

/// How a rasterized pixel reaches the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composite {
    /// Store the source color as-is, discarding the destination pixel.
    None,
    /// Blend the source over the destination with the given operation.
    Blend(CompOp),
}

impl Default for Composite {
    fn default() -> Self {
        Composite::Blend(CompOp::default())
    }
}

impl From<CompOp> for Composite {
    fn from(op: CompOp) -> Self {
        Composite::Blend(op)
    }
}

// ============================================================================
// Premultiplied f64 RGBA working space
// ============================================================================

/// Premultiplied RGBA in f64 [0, 1] working space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PremulRgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl PremulRgba {
    const ZERO: PremulRgba = PremulRgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Premultiply a straight buffer pixel.
    #[inline]
    fn from_pixel(p: Rgba8) -> Self {
        let a = Rgba8::to_double(p.a);
        Self {
            r: Rgba8::to_double(p.r) * a,
            g: Rgba8::to_double(p.g) * a,
            b: Rgba8::to_double(p.b) * a,
            a,
        }
    }

    /// Premultiply a source color whose alpha is `alpha` on the 0..=255 scale.
    #[inline]
    fn from_source(c: &Color, alpha: f64) -> Self {
        let a = (alpha / Rgba8::BASE_MASK as f64).clamp(0.0, 1.0);
        Self {
            r: Color::unit(c.r) * a,
            g: Color::unit(c.g) * a,
            b: Color::unit(c.b) * a,
            a,
        }
    }

    /// Clamp, un-premultiply and round back to a straight pixel.
    ///
    /// A result whose alpha rounds to zero is stored as all zeros.
    #[inline]
    fn to_pixel(self) -> Rgba8 {
        let a = self.a.clamp(0.0, 1.0);
        let alpha = Rgba8::from_double(a);
        if alpha == 0 {
            return Rgba8::TRANSPARENT;
        }
        Rgba8::new(
            Rgba8::from_double(self.r.clamp(0.0, a) / a),
            Rgba8::from_double(self.g.clamp(0.0, a) / a),
            Rgba8::from_double(self.b.clamp(0.0, a) / a),
            alpha,
        )
    }

    /// `Da' = Sa + Da - Sa.Da`, shared by every separable blend mode.
    #[inline]
    fn union_alpha(d: &PremulRgba, s: &PremulRgba) -> f64 {
        s.a + d.a - s.a * d.a
    }
}

// ============================================================================
// Compositing entry point
// ============================================================================

/// Blend `src` with alpha `alpha` (0..=255 scale, may be fractional) onto the
/// straight destination pixel `dst` using `op`, returning the new pixel.
pub fn composite_rgba(dst: Rgba8, src: &Color, alpha: f64, op: CompOp) -> Rgba8 {
    let s = PremulRgba::from_source(src, alpha);
    if op == CompOp::Dst || (s.a <= 0.0 && op.ignores_transparent_source()) {
        return dst;
    }
    let d = PremulRgba::from_pixel(dst);
    blend(op, &d, &s).to_pixel()
}

fn blend(op: CompOp, d: &PremulRgba, s: &PremulRgba) -> PremulRgba {
    match op {
        CompOp::Clear => PremulRgba::ZERO,
        CompOp::Src => *s,
        CompOp::Dst => *d,
        CompOp::SrcOver => blend_src_over(d, s),
        CompOp::DstOver => blend_src_over(s, d),
        CompOp::SrcIn => scale(s, d.a),
        CompOp::DstIn => scale(d, s.a),
        CompOp::SrcOut => scale(s, 1.0 - d.a),
        CompOp::DstOut => scale(d, 1.0 - s.a),
        CompOp::SrcAtop => blend_atop(d, s),
        CompOp::DstAtop => blend_atop(s, d),
        CompOp::Xor => blend_xor(d, s),
        CompOp::Plus => blend_plus(d, s),
        CompOp::Minus => blend_minus(d, s),
        CompOp::Multiply => separable(d, s, |dca, sca, da, sa| {
            sca * dca + sca * (1.0 - da) + dca * (1.0 - sa)
        }),
        CompOp::Screen => separable(d, s, |dca, sca, _, _| sca + dca - sca * dca),
        CompOp::Overlay => separable(d, s, |dca, sca, da, sa| hard_light_calc(sca, dca, sa, da)),
        CompOp::Darken => separable(d, s, |dca, sca, da, sa| {
            (sca * da).min(dca * sa) + sca * (1.0 - da) + dca * (1.0 - sa)
        }),
        CompOp::Lighten => separable(d, s, |dca, sca, da, sa| {
            (sca * da).max(dca * sa) + sca * (1.0 - da) + dca * (1.0 - sa)
        }),
        CompOp::ColorDodge => separable(d, s, color_dodge_calc),
        CompOp::ColorBurn => separable(d, s, color_burn_calc),
        CompOp::HardLight => separable(d, s, hard_light_calc),
        CompOp::SoftLight => separable(d, s, soft_light_calc),
        CompOp::Difference => separable(d, s, |dca, sca, da, sa| {
            sca + dca - 2.0 * (sca * da).min(dca * sa)
        }),
        CompOp::Exclusion => separable(d, s, |dca, sca, da, sa| {
            (sca * da + dca * sa - 2.0 * sca * dca) + sca * (1.0 - da) + dca * (1.0 - sa)
        }),
    }
}

// ---- SrcOver: Dca' = Sca + Dca.(1 - Sa), Da' = Sa + Da.(1 - Sa)
#[inline]
fn blend_src_over(d: &PremulRgba, s: &PremulRgba) -> PremulRgba {
    let s1a = 1.0 - s.a;
    PremulRgba {
        r: s.r + d.r * s1a,
        g: s.g + d.g * s1a,
        b: s.b + d.b * s1a,
        a: s.a + d.a * s1a,
    }
}

#[inline]
fn scale(c: &PremulRgba, k: f64) -> PremulRgba {
    PremulRgba {
        r: c.r * k,
        g: c.g * k,
        b: c.b * k,
        a: c.a * k,
    }
}

// ---- SrcAtop: Dca' = Sca.Da + Dca.(1 - Sa), Da' = Da
#[inline]
fn blend_atop(d: &PremulRgba, s: &PremulRgba) -> PremulRgba {
    let s1a = 1.0 - s.a;
    PremulRgba {
        r: s.r * d.a + d.r * s1a,
        g: s.g * d.a + d.g * s1a,
        b: s.b * d.a + d.b * s1a,
        a: d.a,
    }
}

// ---- Xor: Dca' = Sca.(1 - Da) + Dca.(1 - Sa), Da' = Sa + Da - 2.Sa.Da
#[inline]
fn blend_xor(d: &PremulRgba, s: &PremulRgba) -> PremulRgba {
    let s1a = 1.0 - s.a;
    let d1a = 1.0 - d.a;
    PremulRgba {
        r: s.r * d1a + d.r * s1a,
        g: s.g * d1a + d.g * s1a,
        b: s.b * d1a + d.b * s1a,
        a: s.a + d.a - 2.0 * s.a * d.a,
    }
}

// ---- Plus: Dca' = Sca + Dca, Da' = Sa + Da (clamped)
#[inline]
fn blend_plus(d: &PremulRgba, s: &PremulRgba) -> PremulRgba {
    let a = (s.a + d.a).min(1.0);
    PremulRgba {
        r: (d.r + s.r).min(a),
        g: (d.g + s.g).min(a),
        b: (d.b + s.b).min(a),
        a,
    }
}

// ---- Minus: Dca' = Dca - Sca (clamped), Da' = Sa + Da - Sa.Da
#[inline]
fn blend_minus(d: &PremulRgba, s: &PremulRgba) -> PremulRgba {
    PremulRgba {
        r: (d.r - s.r).max(0.0),
        g: (d.g - s.g).max(0.0),
        b: (d.b - s.b).max(0.0),
        a: PremulRgba::union_alpha(d, s),
    }
}

/// Apply a per-channel formula `f(Dca, Sca, Da, Sa)` with the union alpha.
#[inline]
fn separable(d: &PremulRgba, s: &PremulRgba, f: impl Fn(f64, f64, f64, f64) -> f64) -> PremulRgba {
    PremulRgba {
        r: f(d.r, s.r, d.a, s.a),
        g: f(d.g, s.g, d.a, s.a),
        b: f(d.b, s.b, d.a, s.a),
        a: PremulRgba::union_alpha(d, s),
    }
}

// ---- HardLight (Overlay is HardLight with source and destination swapped)
fn hard_light_calc(dca: f64, sca: f64, da: f64, sa: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if 2.0 * sca <= sa {
        2.0 * sca * dca + tail
    } else {
        sa * da - 2.0 * (da - dca) * (sa - sca) + tail
    }
}

// ---- ColorDodge
fn color_dodge_calc(dca: f64, sca: f64, da: f64, sa: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if sca < sa {
        if da <= 0.0 {
            return tail;
        }
        sa * da * (dca / da * sa / (sa - sca)).min(1.0) + tail
    } else if dca > 0.0 {
        sa * da + tail
    } else {
        sca * (1.0 - da)
    }
}

// ---- ColorBurn
fn color_burn_calc(dca: f64, sca: f64, da: f64, sa: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if sca > 0.0 {
        if da <= 0.0 {
            return tail;
        }
        sa * da * (1.0 - ((1.0 - dca / da) * sa / sca).min(1.0)) + tail
    } else if dca >= da {
        sa * da + dca * (1.0 - sa)
    } else {
        dca * (1.0 - sa)
    }
}

// ---- SoftLight (W3C compositing formula, m = Dca / Da)
fn soft_light_calc(dca: f64, sca: f64, da: f64, sa: f64) -> f64 {
    let m = if da > 0.0 { dca / da } else { 0.0 };
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if 2.0 * sca <= sa {
        dca * (sa + (2.0 * sca - sa) * (1.0 - m)) + tail
    } else if 4.0 * dca <= da {
        let m4 = 4.0 * m;
        dca * sa + da * (2.0 * sca - sa) * (m4 * (m4 + 1.0) * (m - 1.0) + 7.0 * m) + tail
    } else {
        dca * sa + da * (2.0 * sca - sa) * (m.sqrt() - m) + tail
    }
}

// ============================================================================
// Tests
// ============================================================================
