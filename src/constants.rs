//! Application-wide constants.
//!
//! This module defines the application name plus the fixed numeric
//! parameters of the matching pipeline that are not user-configurable.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "ChromaMatch";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "chromamatch";

/// Name of the distance metric reported alongside match results.
pub const METRIC_NAME: &str = "cie2000";

/// Code assigned to catalog records that arrive without one.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// Hard upper bound on the number of results a single query may return.
pub const MAX_RESULT_LIMIT: usize = 20;

/// Number of results returned when the caller does not ask for a specific count.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Allowed range for the k-means cluster count of image extraction.
pub const MIN_CLUSTERS: usize = 1;
/// Upper bound for the k-means cluster count of image extraction.
pub const MAX_CLUSTERS: usize = 8;

/// Default cluster count for image extraction.
pub const DEFAULT_CLUSTERS: usize = 3;

/// Default catalog cache lifetime in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Default timeout for remote catalog requests in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Lightness boost applied to image-derived colors unless overridden.
pub const DEFAULT_IMAGE_LIGHTNESS_BOOST: f64 = 1.05;

/// Factor mapping a Delta E value onto the 0-100 similarity score.
pub const SIMILARITY_SLOPE: f64 = 5.0;
