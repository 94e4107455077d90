//! Display-only CMYK values.

use serde::{Deserialize, Serialize};

/// Subtractive CMYK percentages (0-100 each), derived from RGB for display.
///
/// Never used for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CmykColor {
    /// Cyan percentage
    pub c: u8,
    /// Magenta percentage
    pub m: u8,
    /// Yellow percentage
    pub y: u8,
    /// Key (black) percentage
    pub k: u8,
}

impl CmykColor {
    /// Pure black: no ink except key.
    pub const BLACK: Self = Self::new(0, 0, 0, 100);

    /// Creates a new CMYK value.
    #[must_use]
    pub const fn new(c: u8, m: u8, y: u8, k: u8) -> Self {
        Self { c, m, y, k }
    }
}
