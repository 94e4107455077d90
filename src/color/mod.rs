//! Color-space conversion and perceptual distance.
//!
//! sRGB <-> CIELAB (D65) conversion, the display CMYK conversion, and the
//! CIEDE2000 color-difference formula used to rank catalog entries.

pub mod conversion;
pub mod delta_e;

pub use conversion::{lab_to_rgb, rgb_to_cmyk, rgb_to_lab};
pub use delta_e::{ciede2000, similarity};
