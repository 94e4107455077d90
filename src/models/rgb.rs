//! RGB color handling with hex parsing and serialization.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::color;
use crate::error::MatchError;
use crate::models::{CmykColor, LabColor};

/// Optional leading `#` followed by exactly six hex digits.
static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("hex pattern is valid"));

/// RGB color value with hex string representation.
///
/// Represents a color using red, green, and blue channels (0-255 each).
/// Supports parsing from hex strings (#RRGGBB) and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb".
    /// Surrounding whitespace is ignored; shorthand "#RGB" is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromamatch::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 0, 0));
    ///
    /// let color = RgbColor::from_hex("00ff00").unwrap();
    /// assert_eq!(color, RgbColor::new(0, 255, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidFormat`] if the string is not a valid hex triplet.
    pub fn from_hex(hex: &str) -> Result<Self, MatchError> {
        let captures = HEX_PATTERN
            .captures(hex.trim())
            .ok_or_else(|| MatchError::invalid_format(hex))?;
        let digits = &captures[1];

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| MatchError::invalid_format(hex))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    ///
    /// # Examples
    ///
    /// ```
    /// use chromamatch::models::RgbColor;
    ///
    /// let color = RgbColor::new(0, 128, 255);
    /// assert_eq!(color.to_hex(), "#0080FF");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts the color to CIELAB under the D65 illuminant.
    #[must_use]
    pub fn to_lab(&self) -> LabColor {
        color::rgb_to_lab(*self)
    }

    /// Converts the color to display CMYK percentages.
    #[must_use]
    pub fn to_cmyk(&self) -> CmykColor {
        color::rgb_to_cmyk(*self)
    }

    /// Returns `true` when every channel is strictly above `threshold`.
    #[must_use]
    pub const fn all_above(&self, threshold: u8) -> bool {
        self.r > threshold && self.g > threshold && self.b > threshold
    }

    /// Returns `true` when every channel is strictly below `threshold`.
    #[must_use]
    pub const fn all_below(&self, threshold: u8) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }
}

impl FromStr for RgbColor {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}
