#![forbid(unsafe_code)]

//! Colors.
//!
//! [`PackedRgba`] is the single color representation crossing the
//! effect/host boundary. Effects think in HSL (hue cycling is the common
//! case), so [`PackedRgba::hsla`] is the main constructor they use.

/// A compact RGBA color.
///
/// - **Size:** 4 bytes.
/// - **Layout:** `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0).
///
/// Notes
/// -----
/// This is **straight alpha** storage (RGB channels are not pre-multiplied).
/// Compositing uses Porter-Duff **SourceOver** (`src over dst`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Gray level `v` in `[0, 1]`, opaque.
    #[inline]
    pub fn gray(v: f64) -> Self {
        let c = unit_to_u8(v);
        Self::rgb(c, c, c)
    }

    /// Build from HSL plus alpha.
    ///
    /// `hue` is in degrees and wraps; `saturation`, `lightness` and
    /// `alpha` are clamped to `[0, 1]`.
    pub fn hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
        Self::rgba(r, g, b, unit_to_u8(alpha))
    }

    /// Opaque HSL color.
    #[inline]
    pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self::hsla(hue, saturation, lightness, 1.0)
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    const fn div_round_u8(numer: u64, denom: u64) -> u8 {
        debug_assert!(denom != 0);
        let v = (numer + (denom / 2)) / denom;
        if v > 255 { 255 } else { v as u8 }
    }

    /// Porter-Duff SourceOver: `src over dst`.
    ///
    /// Stored as straight alpha, so the exact rational form is computed and
    /// rounded once at the end.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let s_a = self.a() as u64;
        if s_a == 255 {
            return self;
        }
        if s_a == 0 {
            return dst;
        }

        let d_a = dst.a() as u64;
        let inv_s_a = 255 - s_a;

        // numer_a = 255*s_a + d_a*(255 - s_a), i.e. out_a scaled by 255.
        let numer_a = 255 * s_a + d_a * inv_s_a;
        if numer_a == 0 {
            return Self::TRANSPARENT;
        }

        let out_a = Self::div_round_u8(numer_a, 255);
        let r = Self::div_round_u8(
            (self.r() as u64) * s_a * 255 + (dst.r() as u64) * d_a * inv_s_a,
            numer_a,
        );
        let g = Self::div_round_u8(
            (self.g() as u64) * s_a * 255 + (dst.g() as u64) * d_a * inv_s_a,
            numer_a,
        );
        let b = Self::div_round_u8(
            (self.b() as u64) * s_a * 255 + (dst.b() as u64) * d_a * inv_s_a,
            numer_a,
        );

        Self::rgba(r, g, b, out_a)
    }

    /// Apply uniform opacity in `[0.0, 1.0]` by scaling alpha.
    #[inline]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        let a = ((self.a() as f64) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Scale RGB toward black by `factor` in `[0, 1]`; alpha unchanged.
    #[inline]
    pub fn dimmed(self, factor: f64) -> Self {
        let f = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        let scale = |c: u8| (c as f64 * f).round() as u8;
        Self::rgba(scale(self.r()), scale(self.g()), scale(self.b()), self.a())
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }
}

#[inline]
fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// HSL to 8-bit RGB.
///
/// `hue` is in degrees (any value, wrapped); `s` and `l` are clamped to
/// `[0, 1]`.
pub fn hsl_to_rgb(hue: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = dfx_core::wrap::wrap_degrees(hue);
    let s = if s.is_nan() { 0.0 } else { s.clamp(0.0, 1.0) };
    let l = if l.is_nan() { 0.0 } else { l.clamp(0.0, 1.0) };

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (
        unit_to_u8(r1 + m),
        unit_to_u8(g1 + m),
        unit_to_u8(b1 + m),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_layout() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(c.0, 0x0102_0304);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), (255, 0, 0));
    }

    #[test]
    fn hsl_extremes_ignore_hue() {
        assert_eq!(hsl_to_rgb(200.0, 1.0, 0.0), (0, 0, 0));
        assert_eq!(hsl_to_rgb(200.0, 1.0, 1.0), (255, 255, 255));
        assert_eq!(hsl_to_rgb(77.0, 0.0, 0.5), (128, 128, 128));
    }

    #[test]
    fn hsla_sets_alpha() {
        let c = PackedRgba::hsla(0.0, 1.0, 0.5, 0.2);
        assert_eq!(c.a(), 51);
        assert_eq!(PackedRgba::hsla(0.0, 1.0, 0.5, f64::NAN).a(), 0);
    }

    #[test]
    fn over_opaque_replaces() {
        let src = PackedRgba::rgb(10, 20, 30);
        assert_eq!(src.over(PackedRgba::WHITE), src);
    }

    #[test]
    fn over_transparent_keeps_dst() {
        assert_eq!(PackedRgba::TRANSPARENT.over(PackedRgba::RED), PackedRgba::RED);
    }

    #[test]
    fn over_half_alpha_on_black() {
        let src = PackedRgba::rgba(255, 255, 255, 128);
        let out = src.over(PackedRgba::BLACK);
        assert_eq!(out.a(), 255);
        assert_eq!(out.r(), 128);
    }

    #[test]
    fn dimmed_and_lerp() {
        assert_eq!(PackedRgba::WHITE.dimmed(0.0), PackedRgba::BLACK);
        assert_eq!(PackedRgba::WHITE.dimmed(1.0), PackedRgba::WHITE);
        let mid = PackedRgba::BLACK.lerp(PackedRgba::WHITE, 0.5);
        assert_eq!(mid.r(), 128);
        assert_eq!(PackedRgba::BLACK.lerp(PackedRgba::WHITE, 7.0), PackedRgba::WHITE);
    }

    #[test]
    fn gray_is_clamped() {
        assert_eq!(PackedRgba::gray(2.0), PackedRgba::WHITE);
        assert_eq!(PackedRgba::gray(-1.0), PackedRgba::BLACK);
    }
}
