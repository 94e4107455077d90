//! sRGB, CIELAB and CMYK conversions.
//!
//! The sRGB primaries and the D65 white point are the IEC 61966-2-1 values;
//! the forward and inverse matrices are mutual inverses to seven digits so a
//! hex -> Lab -> hex round trip stays within one unit per channel.

// Standard color science naming (x, y, z; l, a, b) and CIE constants
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::excessive_precision)]
// Channel math is clamped to 0..=255 before narrowing
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::error::ConversionError;
use crate::models::{CmykColor, LabColor, RgbColor};

// D65 reference white, Y normalized to 1
const D65_XN: f64 = 0.95047;
const D65_YN: f64 = 1.00000;
const D65_ZN: f64 = 1.08883;

// CIE constants for the Lab transfer function
const DELTA: f64 = 6.0 / 29.0;
const DELTA_CUBE: f64 = DELTA * DELTA * DELTA;

/// Linear sRGB -> XYZ (D65).
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// XYZ (D65) -> linear sRGB.
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// Converts an 8-bit sRGB color to CIELAB (D65).
///
/// # Examples
///
/// ```
/// use chromamatch::color::rgb_to_lab;
/// use chromamatch::models::RgbColor;
///
/// let white = rgb_to_lab(RgbColor::new(255, 255, 255));
/// assert!((white.l - 100.0).abs() < 0.01);
/// assert!(white.a.abs() < 0.01 && white.b.abs() < 0.01);
/// ```
#[must_use]
pub fn rgb_to_lab(rgb: RgbColor) -> LabColor {
    let linear = [
        srgb_to_linear(f64::from(rgb.r) / 255.0),
        srgb_to_linear(f64::from(rgb.g) / 255.0),
        srgb_to_linear(f64::from(rgb.b) / 255.0),
    ];
    let [x, y, z] = mat_mul(&RGB_TO_XYZ, linear);

    let fx = lab_f(x / D65_XN);
    let fy = lab_f(y / D65_YN);
    let fz = lab_f(z / D65_ZN);

    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Converts a CIELAB (D65) color back to 8-bit sRGB.
///
/// Out-of-gamut channels are clamped to 0..=255 and rounded to nearest.
///
/// # Errors
///
/// Returns [`ConversionError::NonFinite`] if the input or any intermediate
/// value is NaN or infinite.
pub fn lab_to_rgb(lab: LabColor) -> Result<RgbColor, ConversionError> {
    if !lab.is_finite() {
        return Err(ConversionError::NonFinite);
    }

    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let xyz = [
        D65_XN * lab_f_inv(fx),
        D65_YN * lab_f_inv(fy),
        D65_ZN * lab_f_inv(fz),
    ];
    let linear = mat_mul(&XYZ_TO_RGB, xyz);

    let mut channels = [0u8; 3];
    for (out, value) in channels.iter_mut().zip(linear) {
        let encoded = linear_to_srgb(value.clamp(0.0, 1.0)) * 255.0;
        if !encoded.is_finite() {
            return Err(ConversionError::NonFinite);
        }
        *out = encoded.round().clamp(0.0, 255.0) as u8;
    }

    Ok(RgbColor::from(channels))
}

/// Converts an 8-bit sRGB color to CMYK percentages.
///
/// Pure black (all channels 0) maps to `{0, 0, 0, 100}`.
#[must_use]
pub fn rgb_to_cmyk(rgb: RgbColor) -> CmykColor {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    if max <= 0.0 {
        return CmykColor::BLACK;
    }

    let k = 1.0 - max;
    let percent = |v: f64| (v * 100.0).round().clamp(0.0, 100.0) as u8;

    CmykColor::new(
        percent((1.0 - r - k) / max),
        percent((1.0 - g - k) / max),
        percent((1.0 - b - k) / max),
        percent(k),
    )
}

/// sRGB gamma expansion
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma compression
fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    if t > DELTA_CUBE {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

fn mat_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
