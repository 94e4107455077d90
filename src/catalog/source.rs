//! The catalog source abstraction.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::models::catalog::records_from_payload;
use crate::models::{CatalogEntry, RawCatalogRecord};

/// Why a catalog source could not deliver records.
///
/// An empty catalog is not an error; sources return `Ok(vec![])` for it.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source is missing required settings.
    #[error("catalog source is not configured: {0}")]
    NotConfigured(String),

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("catalog service returned HTTP {0}")]
    Status(u16),

    /// The payload is not valid JSON.
    #[error("catalog payload is malformed: {0}")]
    Format(String),

    /// A local catalog file could not be read.
    #[error("failed to read catalog file {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// A provider of raw catalog records.
///
/// Implementations perform their I/O synchronously inside [`fetch`](Self::fetch);
/// the cache decides when that happens.
pub trait CatalogSource: Send + Sync {
    /// Short name used in logs and warnings.
    fn name(&self) -> &str;

    /// Fetches the complete record list.
    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError>;
}

/// Parses a catalog response body.
///
/// A blank body is an empty catalog. See
/// [`records_from_payload`] for the accepted envelopes.
pub fn parse_payload(body: &str) -> Result<Vec<RawCatalogRecord>, SourceError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let payload: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SourceError::Format(e.to_string()))?;
    Ok(records_from_payload(payload))
}

/// Normalizes raw records, dropping those without a usable hex value.
pub fn normalize_records(records: &[RawCatalogRecord], source: &str) -> Vec<CatalogEntry> {
    let entries: Vec<CatalogEntry> = records
        .iter()
        .filter_map(|record| {
            let entry = record.normalize();
            if entry.is_none() {
                debug!(
                    source,
                    code = record.code.as_deref().unwrap_or_default(),
                    "Skipping catalog record without a valid hex value"
                );
            }
            entry
        })
        .collect();

    debug!(
        source,
        records = records.len(),
        entries = entries.len(),
        "Normalized catalog records"
    );
    entries
}
