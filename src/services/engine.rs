//! Ranking of catalog entries against an input color.

use crate::color::similarity;
use crate::constants::MAX_RESULT_LIMIT;
use crate::models::{CatalogEntry, LabColor, MatchResult, RgbColor};

/// Ranked matches plus the number of entries that took part.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Best matches, ascending by delta E
    pub results: Vec<MatchResult>,
    /// Catalog entries with a valid hex that were compared
    pub total_compared: usize,
}

/// Scores catalog entries by CIEDE2000 distance.
///
/// Stateless; the catalog is passed in per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchEngine {
    max_limit: usize,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            max_limit: MAX_RESULT_LIMIT,
        }
    }
}

impl MatchEngine {
    /// Creates an engine returning at most `max_limit` results per query.
    ///
    /// `max_limit` itself is kept within 1..=20.
    pub fn new(max_limit: usize) -> Self {
        Self {
            max_limit: max_limit.clamp(1, MAX_RESULT_LIMIT),
        }
    }

    /// Upper bound on results per query.
    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Clamps a requested result count into `1..=max_limit`.
    pub fn clamp_limit(&self, limit: usize) -> usize {
        limit.clamp(1, self.max_limit)
    }

    /// Returns the `limit` closest entries to `input`, closest first.
    ///
    /// Entries whose hex does not parse are skipped. Equal distances keep
    /// catalog order.
    pub fn rank(&self, input: LabColor, catalog: &[CatalogEntry], limit: usize) -> Vec<MatchResult> {
        self.rank_detailed(input, catalog, limit).results
    }

    /// Like [`rank`](Self::rank), also reporting how many entries were compared.
    pub fn rank_detailed(&self, input: LabColor, catalog: &[CatalogEntry], limit: usize) -> Ranking {
        let mut scored: Vec<(f64, &CatalogEntry, RgbColor, LabColor)> = catalog
            .iter()
            .filter_map(|entry| {
                let rgb = entry.rgb()?;
                let lab = rgb.to_lab();
                Some((input.delta_e(&lab), entry, rgb, lab))
            })
            .collect();
        let total_compared = scored.len();

        // sort_by is stable, so ties stay in catalog order
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(self.clamp_limit(limit));

        let results = scored
            .into_iter()
            .map(|(delta_e, entry, rgb, lab)| MatchResult {
                code: entry.code.clone(),
                name: entry.name.clone(),
                hex: rgb.to_hex(),
                swatch_url: entry.swatch_url.clone(),
                delta_e,
                similarity: similarity(delta_e),
                rgb,
                lab,
                cmyk: rgb.to_cmyk(),
            })
            .collect();

        Ranking {
            results,
            total_compared,
        }
    }
}
