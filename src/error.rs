//! Error types shared by the matching core.
//!
//! Catalog source failures live in [`crate::catalog::SourceError`] since they
//! never reach query callers directly: the cache recovers from them.

use thiserror::Error;

/// Errors surfaced to callers of the matching queries.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The input is not a `#RRGGBB` / `RRGGBB` hex triplet.
    #[error("Invalid HEX format '{input}'. Use #RRGGBB or RRGGBB.")]
    InvalidFormat {
        /// The rejected input, as given.
        input: String,
    },

    /// A numeric query parameter is out of its accepted domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No dominant color could be extracted from the supplied image.
    #[error("Could not extract dominant color from image: {0}")]
    ExtractionFailed(#[from] ExtractionError),
}

impl MatchError {
    /// Builds an [`MatchError::InvalidFormat`] for the given input.
    pub fn invalid_format(input: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.into(),
        }
    }
}

/// Reasons the dominant-color extractor produced no color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The bytes are not a decodable raster image.
    #[error("image could not be decoded: {0}")]
    Decode(String),

    /// The decoded image contains no pixels.
    #[error("image contains no usable pixels")]
    NoPixels,
}

/// Failure of a color-space conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// An intermediate value was NaN or infinite.
    #[error("color conversion produced a non-finite value")]
    NonFinite,
}
