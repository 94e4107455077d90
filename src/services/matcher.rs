//! The query surface: hex and image matching, code lookup and catalog status.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{CacheState, CatalogCache, CatalogOrigin, LocalFileSource, RemoteSource};
use crate::config::{CatalogSourceKind, Config};
use crate::constants::{
    DEFAULT_CLUSTERS, DEFAULT_IMAGE_LIGHTNESS_BOOST, MAX_CLUSTERS, METRIC_NAME, MIN_CLUSTERS,
};
use crate::error::MatchError;
use crate::extract::{Compensation, DominantColorExtractor};
use crate::models::{CatalogEntry, LabColor, MatchResult, RgbColor};
use crate::services::engine::MatchEngine;

/// Result of a hex (or extracted-color) query.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Query color as "#RRGGBB"
    pub input_hex: String,
    /// Distance metric, always "cie2000"
    pub metric: &'static str,
    /// Catalog origin the results were ranked against
    pub catalog_source: CatalogOrigin,
    /// Non-fatal catalog problem, e.g. a fallback
    pub warning: Option<String>,
    /// Number of valid catalog entries compared
    pub total_compared: usize,
    /// Closest entries first
    pub results: Vec<MatchResult>,
}

/// Extraction parameters of an image query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageMatchParams {
    /// k-means cluster count (clamped to 1..=8)
    pub n_clusters: usize,
    /// Apply fabric compensation to the extracted color
    pub fabric_mode: bool,
    /// Lightness multiplier applied before ranking
    pub lightness_boost: f64,
}

impl Default for ImageMatchParams {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_CLUSTERS,
            fabric_mode: true,
            lightness_boost: DEFAULT_IMAGE_LIGHTNESS_BOOST,
        }
    }
}

/// Result of an image query.
#[derive(Debug, Clone, Serialize)]
pub struct ImageMatchReport {
    /// Dominant color reported by the extractor
    pub extracted_hex: String,
    /// Always "image"
    pub mode: &'static str,
    /// Outcome of fabric compensation
    pub compensation: Compensation,
    /// Effective parameters after clamping
    pub params: ImageMatchParams,
    /// Ranking of the extracted color
    #[serde(flatten)]
    pub report: MatchReport,
}

/// Catalog health summary.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStatus {
    /// Origin of the current snapshot
    pub source: CatalogOrigin,
    /// Number of entries in the current snapshot
    pub rows: usize,
    /// Non-fatal problem from the last refresh
    pub warning: Option<String>,
    /// Cache state after the status read
    pub state: CacheState,
}

/// Matches colors against the cached catalog.
///
/// Cheap to share: the only mutable state is inside the [`CatalogCache`].
#[derive(Debug)]
pub struct ColorMatcher {
    cache: Arc<CatalogCache>,
    engine: MatchEngine,
    extractor: DominantColorExtractor,
}

impl ColorMatcher {
    /// Creates a matcher over the given cache with default engine and extractor.
    pub fn new(cache: Arc<CatalogCache>) -> Self {
        Self {
            cache,
            engine: MatchEngine::default(),
            extractor: DominantColorExtractor::new(),
        }
    }

    /// Wires the cache, sources and engine described by `config`.
    ///
    /// Nothing is fetched until the first query.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = &config.catalog;
        let local = LocalFileSource::new(config.catalog_path()?);
        let ttl = Duration::from_secs(catalog.cache_ttl_secs);

        let cache = match catalog.source {
            CatalogSourceKind::Remote => {
                let remote = RemoteSource::new(
                    catalog.remote_url.clone(),
                    catalog.api_key.clone(),
                    Duration::from_secs(catalog.request_timeout_secs),
                );
                CatalogCache::with_remote(remote, local, ttl)
            }
            CatalogSourceKind::Local => CatalogCache::with_local(local, ttl),
        };
        debug!(source = %catalog.source, "Catalog cache configured");

        Ok(Self::new(Arc::new(cache)).with_engine(MatchEngine::new(config.matching.max_limit)))
    }

    /// Replaces the ranking engine.
    #[must_use]
    pub fn with_engine(mut self, engine: MatchEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: DominantColorExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The underlying cache.
    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    /// Ranks the catalog against a hex color.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidFormat`] for malformed hex,
    /// [`MatchError::InvalidParameter`] for a non-positive or non-finite boost.
    pub fn match_hex(
        &self,
        hex: &str,
        limit: usize,
        lightness_boost: f64,
    ) -> Result<MatchReport, MatchError> {
        validate_boost(lightness_boost)?;
        let rgb = RgbColor::from_hex(hex)?;
        Ok(self.rank(rgb, rgb.to_lab().with_lightness_boost(lightness_boost), limit))
    }

    /// Extracts the dominant color of an image and ranks the catalog against it.
    ///
    /// # Errors
    ///
    /// [`MatchError::ExtractionFailed`] when no color could be extracted,
    /// [`MatchError::InvalidParameter`] for a non-positive or non-finite boost.
    pub fn match_image(
        &self,
        bytes: &[u8],
        limit: usize,
        params: ImageMatchParams,
    ) -> Result<ImageMatchReport, MatchError> {
        validate_boost(params.lightness_boost)?;
        let params = ImageMatchParams {
            n_clusters: params.n_clusters.clamp(MIN_CLUSTERS, MAX_CLUSTERS),
            ..params
        };

        let extraction = self
            .extractor
            .extract(bytes, params.n_clusters, params.fabric_mode)?;
        let lab = extraction
            .color
            .to_lab()
            .with_lightness_boost(params.lightness_boost);

        Ok(ImageMatchReport {
            extracted_hex: extraction.hex(),
            mode: "image",
            compensation: extraction.compensation,
            params,
            report: self.rank(extraction.color, lab, limit),
        })
    }

    /// Looks up a catalog entry by code, ignoring case and surrounding whitespace.
    pub fn find_by_code(&self, code: &str) -> Option<CatalogEntry> {
        let wanted = code.trim();
        self.cache
            .get()
            .entries
            .iter()
            .find(|entry| entry.code.eq_ignore_ascii_case(wanted))
            .cloned()
    }

    /// Loads the catalog if needed and summarizes it.
    pub fn catalog_status(&self) -> CatalogStatus {
        let snapshot = self.cache.get();
        CatalogStatus {
            source: snapshot.origin,
            rows: snapshot.len(),
            warning: snapshot.warning.clone(),
            state: self.cache.state(),
        }
    }

    fn rank(&self, input: RgbColor, lab: LabColor, limit: usize) -> MatchReport {
        let snapshot = self.cache.get();
        let ranking = self.engine.rank_detailed(lab, &snapshot.entries, limit);
        debug!(
            input = %input,
            compared = ranking.total_compared,
            returned = ranking.results.len(),
            "Ranked catalog"
        );

        MatchReport {
            input_hex: input.to_hex(),
            metric: METRIC_NAME,
            catalog_source: snapshot.origin,
            warning: snapshot.warning.clone(),
            total_compared: ranking.total_compared,
            results: ranking.results,
        }
    }
}

fn validate_boost(boost: f64) -> Result<(), MatchError> {
    if boost.is_finite() && boost > 0.0 {
        Ok(())
    } else {
        Err(MatchError::InvalidParameter(format!(
            "lightness boost must be a positive number, got {boost}"
        )))
    }
}
