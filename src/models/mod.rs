//! Data models for colors, catalog entries and match results.

pub mod catalog;
pub mod cmyk;
pub mod lab;
pub mod matching;
pub mod rgb;

pub use catalog::{CatalogEntry, RawCatalogRecord};
pub use cmyk::CmykColor;
pub use lab::LabColor;
pub use matching::MatchResult;
pub use rgb::RgbColor;
