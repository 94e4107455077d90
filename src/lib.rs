//! ChromaMatch Library
//!
//! Perceptual color matching against a reference color catalog. Colors come
//! in as hex triplets or photographed swatches, are converted to CIELAB and
//! ranked against the catalog with the CIEDE2000 color difference.
//!
//! The catalog is served from a time-bounded cache over a remote service with
//! a local JSON fallback.

// Module declarations
pub mod catalog;
pub mod cli;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod models;
pub mod services;

pub use error::{ConversionError, ExtractionError, MatchError};
