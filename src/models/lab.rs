//! CIELAB color values (D65).

use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::ConversionError;
use crate::models::RgbColor;

/// A color in the CIELAB space under the D65 reference white.
///
/// `l` spans 0 (black) to 100 (diffuse white); `a` (green to red) and `b`
/// (blue to yellow) are roughly within ±128 for displayable colors. All
/// perceptual comparisons happen in this space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    /// Lightness
    #[serde(rename = "L")]
    pub l: f64,
    /// Green-red opponent axis
    pub a: f64,
    /// Blue-yellow opponent axis
    pub b: f64,
}

impl LabColor {
    /// Creates a new Lab color.
    #[must_use]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// CIEDE2000 distance to `other`.
    #[must_use]
    pub fn delta_e(&self, other: &Self) -> f64 {
        color::ciede2000(*self, *other)
    }

    /// Converts back to 8-bit sRGB, clamping out-of-gamut channels.
    pub fn to_rgb(&self) -> Result<RgbColor, ConversionError> {
        color::lab_to_rgb(*self)
    }

    /// Scales lightness by `l_factor` and both chroma axes by `ab_factor`.
    #[must_use]
    pub fn scaled(&self, l_factor: f64, ab_factor: f64) -> Self {
        Self::new(self.l * l_factor, self.a * ab_factor, self.b * ab_factor)
    }

    /// Multiplies lightness by `boost`, never exceeding 100.
    ///
    /// A boost of exactly 1.0 leaves the color untouched.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn with_lightness_boost(&self, boost: f64) -> Self {
        if boost == 1.0 {
            return *self;
        }
        Self::new((self.l * boost).min(100.0), self.a, self.b)
    }

    /// Returns `true` when all three components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }
}
