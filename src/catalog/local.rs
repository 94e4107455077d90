//! Catalog sources that never touch the network.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::source::{parse_payload, CatalogSource, SourceError};
use crate::models::{CatalogEntry, RawCatalogRecord};

/// Reads the catalog from a JSON file on disk.
///
/// The file holds the same shapes the remote service returns: a bare array of
/// records or an object wrapping it in `items`, `results` or `data`.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    /// Creates a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for LocalFileSource {
    fn name(&self) -> &str {
        "local"
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        let body = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_payload(&body)
    }
}

/// An in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawCatalogRecord>,
}

impl StaticSource {
    /// Wraps already deserialized raw records.
    pub fn new(records: Vec<RawCatalogRecord>) -> Self {
        Self { records }
    }

    /// Builds a source from catalog entries.
    ///
    /// Entries still pass through normalization when the cache loads them.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let records = entries
            .into_iter()
            .map(|entry| RawCatalogRecord {
                code: Some(entry.code),
                name: Some(entry.name),
                hex: Some(entry.hex),
                swatch_img: entry.swatch_url.map(serde_json::Value::String),
                ..RawCatalogRecord::default()
            })
            .collect();
        Self { records }
    }
}

impl CatalogSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_file_reads_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(
            &path,
            r##"{"data": [{"code": "11-0601 TCX", "name": "Bright White", "hex": "#F4F5F0"}]}"##,
        )
        .unwrap();

        let records = LocalFileSource::new(&path).fetch().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Bright White"));
    }

    #[test]
    fn test_local_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        match LocalFileSource::new(&path).fetch() {
            Err(SourceError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_local_file_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(&path, "not json").unwrap();

        let err = LocalFileSource::new(&path).fetch().unwrap_err();
        assert!(matches!(err, SourceError::Format(_)));
    }

    #[test]
    fn test_static_source_from_entries() {
        let source = StaticSource::from_entries(vec![
            CatalogEntry::new("A", "Alpha", "#ff0000").with_swatch("a.png")
        ]);
        let records = source.fetch().unwrap();
        let entry = records[0].normalize().unwrap();

        assert_eq!(entry.hex, "#FF0000");
        assert_eq!(entry.swatch_url.as_deref(), Some("a.png"));
    }
}
