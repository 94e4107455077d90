//! Service layer for the matching queries.
//!
//! [`MatchEngine`] ranks a catalog against one Lab color; [`ColorMatcher`]
//! ties it to the catalog cache and the dominant-color extractor and exposes
//! the queries the CLI (or any other front end) calls.

pub mod engine;
pub mod matcher;

// Re-export commonly used types
pub use engine::{MatchEngine, Ranking};
pub use matcher::{CatalogStatus, ColorMatcher, ImageMatchParams, ImageMatchReport, MatchReport};
