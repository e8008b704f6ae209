//! Color types and conversion functions for colorfix.
//!
//! Provides three color types (`Rgb`, `Xyz`, `Lab`) and pure conversion
//! functions between them. The Lab space is CIE 1976 L*a*b* relative to the
//! D65 reference white with the 2° standard observer. All intermediate math
//! uses `f64`; only `Rgb` is quantized.
//!
//! The chain is `Rgb -> Xyz -> Lab` and back. `Lab -> Rgb` clamps each channel
//! to 0..=255 independently, so out-of-gamut Lab values saturate instead of
//! failing.

use crate::error::ColorError;
use std::f64::consts::TAU;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// D65 reference white (2° observer), X component on the 0..100 scale.
const REF_X: f64 = 95.047;
/// D65 reference white (2° observer), Y component on the 0..100 scale.
const REF_Y: f64 = 100.0;
/// D65 reference white (2° observer), Z component on the 0..100 scale.
const REF_Z: f64 = 108.883;

/// Below this ratio the Lab nonlinearity uses its linear segment.
const LAB_EPSILON: f64 = 0.008856;
/// Slope of the linear segment of the Lab nonlinearity.
const LAB_LINEAR_SLOPE: f64 = 7.787;
/// Offset of the linear segment of the Lab nonlinearity.
const LAB_LINEAR_OFFSET: f64 = 16.0 / 116.0;

/// An 8-bit sRGB color with no alpha channel.
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// CIE XYZ tristimulus values on the 0..100 scale (Y = 100 for white).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b* color (D65, 2° observer).
///
/// `l` is nominally 0..=100; `a` and `b` are unbounded but stay roughly
/// within -128..=127 for colors that came from `Rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `ColorError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, ColorError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(ColorError::InvalidColor(format!(
                "non-ASCII characters in {hex:?}"
            )));
        }
        if hex.len() != 6 {
            return Err(ColorError::InvalidColor(format!(
                "expected 6 hex digits, got {}",
                hex.len()
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| ColorError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| ColorError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| ColorError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Rgb { r, g, b })
    }

    /// Formats the color as a lowercase `"#rrggbb"` string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Unpacks a Windows `COLORREF` (`0x00BBGGRR`). The high byte is ignored.
    pub const fn from_colorref(value: u32) -> Self {
        Self {
            r: (value & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: ((value >> 16) & 0xff) as u8,
        }
    }

    /// Packs the color as a Windows `COLORREF` (`0x00BBGGRR`).
    pub const fn to_colorref(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Magnitude of the (a, b) vector.
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle of the (a, b) vector in degrees, in [0, 360).
    ///
    /// Achromatic colors (a = b = 0) report a hue of 0.
    pub fn hue_degrees(self) -> f64 {
        hue_angle(self.b, self.a).to_degrees()
    }

    /// Returns a copy with lightness replaced, keeping `a` and `b`.
    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }
}

/// Hue angle of `(a, b)` in radians, in `[0, 2π)`; 0 when both are zero.
///
/// Shared with the CIEDE2000 formula, which passes the corrected `a'`.
pub(crate) fn hue_angle(b: f64, a: f64) -> f64 {
    if b == 0.0 && a == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a);
    if h >= 0.0 {
        h
    } else {
        h + TAU
    }
}

/// Applies inverse sRGB gamma to a single channel in [0, 1].
fn srgb_component_to_linear(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Applies sRGB gamma to a single linear channel.
fn linear_component_to_srgb(c: f64) -> f64 {
    if c > 0.0031308 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

/// Lab companding function applied to a reference-white ratio.
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_LINEAR_SLOPE * t + LAB_LINEAR_OFFSET
    }
}

/// Inverse of [`lab_f`].
fn lab_f_inv(t: f64) -> f64 {
    let cube = t * t * t;
    if cube > LAB_EPSILON {
        cube
    } else {
        (t - LAB_LINEAR_OFFSET) / LAB_LINEAR_SLOPE
    }
}

/// Clamps a 0..255-scaled channel and rounds it to the nearest integer.
fn quantize(v: f64) -> u8 {
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v.round() as u8
    }
}

/// Converts an 8-bit sRGB color to XYZ (0..100 scale) using the D65 sRGB primaries.
pub fn rgb_to_xyz(c: Rgb) -> Xyz {
    let r = srgb_component_to_linear(c.r as f64 / 255.0) * 100.0;
    let g = srgb_component_to_linear(c.g as f64 / 255.0) * 100.0;
    let b = srgb_component_to_linear(c.b as f64 / 255.0) * 100.0;

    Xyz {
        x: r * 0.4124 + g * 0.3576 + b * 0.1805,
        y: r * 0.2126 + g * 0.7152 + b * 0.0722,
        z: r * 0.0193 + g * 0.1192 + b * 0.9505,
    }
}

/// Converts XYZ to Lab relative to the D65 reference white.
pub fn xyz_to_lab(c: Xyz) -> Lab {
    let fx = lab_f(c.x / REF_X);
    let fy = lab_f(c.y / REF_Y);
    let fz = lab_f(c.z / REF_Z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts Lab back to XYZ (0..100 scale).
pub fn lab_to_xyz(c: Lab) -> Xyz {
    let fy = (c.l + 16.0) / 116.0;
    let fx = c.a / 500.0 + fy;
    let fz = fy - c.b / 200.0;

    Xyz {
        x: REF_X * lab_f_inv(fx),
        y: REF_Y * lab_f_inv(fy),
        z: REF_Z * lab_f_inv(fz),
    }
}

/// Converts XYZ to 8-bit sRGB, clamping each channel to 0..=255.
pub fn xyz_to_rgb(c: Xyz) -> Rgb {
    let x = c.x / 100.0;
    let y = c.y / 100.0;
    let z = c.z / 100.0;

    let r = x * 3.2406 + y * -1.5372 + z * -0.4986;
    let g = x * -0.9689 + y * 1.8758 + z * 0.0415;
    let b = x * 0.0557 + y * -0.2040 + z * 1.0570;

    Rgb {
        r: quantize(linear_component_to_srgb(r) * 255.0),
        g: quantize(linear_component_to_srgb(g) * 255.0),
        b: quantize(linear_component_to_srgb(b) * 255.0),
    }
}

/// Convenience: sRGB to Lab via the chain sRGB -> XYZ -> Lab.
pub fn rgb_to_lab(c: Rgb) -> Lab {
    xyz_to_lab(rgb_to_xyz(c))
}

/// Convenience: Lab to sRGB via the chain Lab -> XYZ -> sRGB, with every
/// channel clamped to 0..=255.
pub fn lab_to_rgb(c: Lab) -> Rgb {
    xyz_to_rgb(lab_to_xyz(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-1;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    // -- Reference Lab values --

    #[test]
    fn white_is_l_100_and_neutral() {
        let lab = rgb_to_lab(Rgb::WHITE);
        assert!(approx_eq(lab.l, 100.0, TOLERANCE), "L: {}", lab.l);
        assert!(approx_eq(lab.a, 0.0, TOLERANCE), "a: {}", lab.a);
        assert!(approx_eq(lab.b, 0.0, TOLERANCE), "b: {}", lab.b);
    }

    #[test]
    fn black_is_l_0_and_neutral() {
        let lab = rgb_to_lab(Rgb::BLACK);
        assert!(approx_eq(lab.l, 0.0, TOLERANCE), "L: {}", lab.l);
        assert!(approx_eq(lab.a, 0.0, TOLERANCE), "a: {}", lab.a);
        assert!(approx_eq(lab.b, 0.0, TOLERANCE), "b: {}", lab.b);
    }

    #[test]
    fn primaries_match_reference_lab() {
        let cases = [
            (Rgb::new(255, 0, 0), Lab::new(53.23, 80.11, 67.22)),
            (Rgb::new(0, 255, 0), Lab::new(87.74, -86.18, 83.18)),
            (Rgb::new(0, 0, 255), Lab::new(32.30, 79.20, -107.86)),
            (Rgb::new(255, 255, 0), Lab::new(97.14, -21.56, 94.48)),
        ];
        for (rgb, expected) in cases {
            let lab = rgb_to_lab(rgb);
            assert!(approx_eq(lab.l, expected.l, 0.05), "{rgb:?} L: {}", lab.l);
            assert!(approx_eq(lab.a, expected.a, 0.05), "{rgb:?} a: {}", lab.a);
            assert!(approx_eq(lab.b, expected.b, 0.05), "{rgb:?} b: {}", lab.b);
        }
    }

    #[test]
    fn grays_are_nearly_achromatic() {
        for v in (0..=255u8).step_by(5) {
            let lab = rgb_to_lab(Rgb::new(v, v, v));
            assert!(lab.a.abs() < 0.05, "gray {v} a: {}", lab.a);
            assert!(lab.b.abs() < 0.05, "gray {v} b: {}", lab.b);
        }
    }

    #[test]
    fn lightness_is_monotonic_over_grays() {
        let mut prev = rgb_to_lab(Rgb::BLACK).l;
        for v in 1..=255u8 {
            let l = rgb_to_lab(Rgb::new(v, v, v)).l;
            assert!(l > prev, "L not increasing at gray {v}: {l} <= {prev}");
            prev = l;
        }
    }

    #[test]
    fn mid_gray_lightness() {
        let lab = rgb_to_lab(Rgb::new(128, 128, 128));
        assert!(approx_eq(lab.l, 53.585, 1e-3), "L: {}", lab.l);
    }

    // -- Nonlinearity boundaries --

    #[test]
    fn srgb_linearization_boundary_at_0_04045() {
        assert!(approx_eq(srgb_component_to_linear(0.04045), 0.04045 / 12.92, 1e-12));
        let above = srgb_component_to_linear(0.04046);
        let expected = ((0.04046 + 0.055) / 1.055_f64).powf(2.4);
        assert!(approx_eq(above, expected, 1e-12));
    }

    #[test]
    fn srgb_encoding_boundary_at_0_0031308() {
        assert!(approx_eq(linear_component_to_srgb(0.0031308), 0.0031308 * 12.92, 1e-12));
        let above = linear_component_to_srgb(0.0031309);
        let expected = 1.055 * 0.0031309_f64.powf(1.0 / 2.4) - 0.055;
        assert!(approx_eq(above, expected, 1e-12));
    }

    #[test]
    fn lab_f_uses_linear_segment_for_small_ratios() {
        let t = 0.001;
        assert!(approx_eq(lab_f(t), 7.787 * t + 16.0 / 116.0, 1e-12));
        assert!(approx_eq(lab_f(0.5), 0.5_f64.cbrt(), 1e-12));
    }

    #[test]
    fn lab_f_inv_inverts_both_segments() {
        for t in [0.0005, 0.005, 0.0088, 0.01, 0.2, 0.9, 1.0] {
            assert!(
                approx_eq(lab_f_inv(lab_f(t)), t, 1e-9),
                "t={t}: {}",
                lab_f_inv(lab_f(t))
            );
        }
    }

    // -- Lab -> Rgb clamping --

    #[test]
    fn lab_to_rgb_clamps_above_white() {
        assert_eq!(lab_to_rgb(Lab::new(120.0, 0.0, 0.0)), Rgb::WHITE);
    }

    #[test]
    fn lab_to_rgb_clamps_below_black() {
        assert_eq!(lab_to_rgb(Lab::new(-10.0, 0.0, 0.0)), Rgb::BLACK);
    }

    #[test]
    fn lab_to_rgb_saturates_out_of_gamut_channels_independently() {
        // Far beyond the sRGB gamut on the red/magenta side.
        let rgb = lab_to_rgb(Lab::new(50.0, 120.0, 0.0));
        assert_eq!(rgb.r, 255);
        assert_eq!(rgb.g, 0);
        assert!(rgb.b > 0 && rgb.b < 255, "b: {}", rgb.b);
    }

    #[test]
    fn lab_to_rgb_maps_neutral_endpoints() {
        assert_eq!(lab_to_rgb(Lab::new(100.0, 0.0, 0.0)), Rgb::WHITE);
        assert_eq!(lab_to_rgb(Lab::new(0.0, 0.0, 0.0)), Rgb::BLACK);
    }

    // -- Round trip --

    #[test]
    fn round_trip_is_exact_on_a_coarse_grid() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    let c = Rgb::new(r, g, b);
                    assert_eq!(lab_to_rgb(rgb_to_lab(c)), c);
                }
            }
        }
    }

    #[test]
    fn round_trip_is_exact_for_all_grays() {
        for v in 0..=255u8 {
            let c = Rgb::new(v, v, v);
            assert_eq!(lab_to_rgb(rgb_to_lab(c)), c);
        }
    }

    // -- Lab helpers --

    #[test]
    fn chroma_and_hue_of_red() {
        let lab = rgb_to_lab(Rgb::new(255, 0, 0));
        assert!(approx_eq(lab.chroma(), 104.58, 0.05), "C: {}", lab.chroma());
        assert!(approx_eq(lab.hue_degrees(), 40.0, 0.05), "h: {}", lab.hue_degrees());
    }

    #[test]
    fn hue_of_achromatic_is_zero() {
        assert_eq!(Lab::new(50.0, 0.0, 0.0).hue_degrees(), 0.0);
    }

    #[test]
    fn hue_is_wrapped_into_positive_range() {
        let h = Lab::new(50.0, 10.0, -10.0).hue_degrees();
        assert!(approx_eq(h, 315.0, 1e-9), "h: {h}");
    }

    #[test]
    fn hue_angle_of_origin_is_zero() {
        assert_eq!(hue_angle(0.0, 0.0), 0.0);
        assert_eq!(hue_angle(-0.0, 0.0), 0.0);
    }

    #[test]
    fn hue_angle_is_normalized_to_positive_range() {
        let h = hue_angle(-1.0, 0.0);
        assert!(approx_eq(h, 3.0 * std::f64::consts::FRAC_PI_2, 1e-12), "got {h}");
        let h = hue_angle(0.0, -1.0);
        assert!(approx_eq(h, std::f64::consts::PI, 1e-12), "got {h}");
    }

    #[test]
    fn hue_degrees_matches_hue_angle() {
        let lab = Lab::new(60.0, -20.0, 35.0);
        assert_eq!(lab.hue_degrees(), hue_angle(lab.b, lab.a).to_degrees());
    }

    #[test]
    fn with_lightness_keeps_a_and_b() {
        let lab = Lab::new(40.0, 12.5, -7.25).with_lightness(75.0);
        assert_eq!(lab, Lab::new(75.0, 12.5, -7.25));
    }

    // -- Hex parsing --

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#ff0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hex("00ff00").unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn from_hex_is_case_insensitive_and_trims() {
        let upper = Rgb::from_hex("#C0FFEE").unwrap();
        let lower = Rgb::from_hex("  #c0ffee ").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, Rgb::new(0xc0, 0xff, 0xee));
    }

    #[test]
    fn from_hex_returns_error_for_invalid_input() {
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ff00ff00").is_err());
        // Multi-byte input must not panic on a char boundary.
        assert!(Rgb::from_hex("aébcd").is_err());
    }

    #[test]
    fn to_hex_is_lowercase() {
        assert_eq!(Rgb::new(0xAB, 0x04, 0xFF).to_hex(), "#ab04ff");
    }

    #[test]
    fn hex_round_trip() {
        let original = "#804020";
        assert_eq!(Rgb::from_hex(original).unwrap().to_hex(), original);
    }

    // -- COLORREF packing --

    #[test]
    fn colorref_byte_order_is_bgr() {
        let c = Rgb::from_colorref(0x00_33_22_11);
        assert_eq!(c, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(c.to_colorref(), 0x00_33_22_11);
    }

    #[test]
    fn colorref_high_byte_is_ignored() {
        let c = Rgb::from_colorref(0xff_00_00_ff);
        assert_eq!(c, Rgb::new(255, 0, 0));
        assert_eq!(c.to_colorref(), 0x00_00_00_ff);
    }

    // -- Serde --

    #[test]
    fn rgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
    }

    #[test]
    fn rgb_deserializes_from_hex_string() {
        let green: Rgb = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(green, Rgb::new(0, 255, 0));
    }

    #[test]
    fn rgb_deserialize_rejects_invalid_hex() {
        let result: Result<Rgb, _> = serde_json::from_str("\"not-a-color\"");
        assert!(result.is_err());
    }

    #[test]
    fn lab_serializes_as_struct() {
        let json = serde_json::to_value(Lab::new(50.0, -1.5, 2.0)).unwrap();
        assert_eq!(json, serde_json::json!({"l": 50.0, "a": -1.5, "b": 2.0}));
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_rgb() -> impl Strategy<Value = Rgb> {
            (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
        }

        proptest! {
            #[test]
            fn rgb_lab_round_trip_is_identity(c in any_rgb()) {
                prop_assert_eq!(lab_to_rgb(rgb_to_lab(c)), c);
            }

            #[test]
            fn round_trip_is_a_fixed_point(c in any_rgb()) {
                let once = lab_to_rgb(rgb_to_lab(c));
                let twice = lab_to_rgb(rgb_to_lab(once));
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn lightness_stays_in_nominal_range(c in any_rgb()) {
                let lab = rgb_to_lab(c);
                prop_assert!(lab.l >= -1e-9 && lab.l <= 100.0 + 1e-3, "L: {}", lab.l);
                prop_assert!(lab.a.abs() < 130.0 && lab.b.abs() < 130.0,
                    "a/b out of range: {} {}", lab.a, lab.b);
            }

            #[test]
            fn lab_to_rgb_is_total(
                l in -50.0_f64..=150.0,
                a in -200.0_f64..=200.0,
                b in -200.0_f64..=200.0,
            ) {
                // Any finite Lab value maps to some color without panicking.
                let _ = lab_to_rgb(Lab::new(l, a, b));
            }

            #[test]
            fn colorref_round_trip(c in any_rgb()) {
                prop_assert_eq!(Rgb::from_colorref(c.to_colorref()), c);
            }

            #[test]
            fn hex_round_trip_is_exact(c in any_rgb()) {
                prop_assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap(), c);
            }
        }
    }
}
