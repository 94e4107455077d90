//! Catalog entries and the normalization of raw catalog records.
//!
//! Catalog data arrives from a remote service or a local JSON file in a loose
//! shape: codes may be missing, the hex may live under one of several keys and
//! the swatch image may be a string or an object. [`RawCatalogRecord::normalize`]
//! is the single place that turns those records into [`CatalogEntry`] values;
//! everything downstream assumes a well-formed entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::UNKNOWN_CODE;
use crate::models::RgbColor;

/// A reference color in the catalog.
///
/// Entries are immutable; a catalog refresh replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique catalog code (e.g., "18-1664 TPX")
    pub code: String,
    /// Human-readable color name
    pub name: String,
    /// Hex color, normalized to "#RRGGBB" when built from a raw record
    pub hex: String,
    /// Optional reference to a swatch image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_url: Option<String>,
}

impl CatalogEntry {
    /// Creates an entry without validating the hex value.
    ///
    /// Ranking skips entries whose hex does not parse.
    pub fn new(code: impl Into<String>, name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            hex: hex.into(),
            swatch_url: None,
        }
    }

    /// Sets the swatch reference.
    #[must_use]
    pub fn with_swatch(mut self, url: impl Into<String>) -> Self {
        self.swatch_url = Some(url.into());
        self
    }

    /// Parses the entry's hex value.
    pub fn rgb(&self) -> Option<RgbColor> {
        RgbColor::from_hex(&self.hex).ok()
    }
}

/// A catalog record as delivered by a source, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogRecord {
    /// Catalog code, possibly missing or blank
    #[serde(default)]
    pub code: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Preferred hex field of the remote catalog
    #[serde(default)]
    pub hex_code: Option<String>,
    /// Hex measured from the swatch image
    #[serde(default)]
    pub extracted_hex: Option<String>,
    /// Plain hex field used by local catalog files
    #[serde(default)]
    pub hex: Option<String>,
    /// Swatch image: either a URL string or an object with `url` / `path`
    #[serde(default)]
    pub swatch_img: Option<Value>,
}

impl RawCatalogRecord {
    /// Validates the record and converts it into a [`CatalogEntry`].
    ///
    /// Returns `None` when no usable hex value is present. A missing or blank
    /// code becomes `"UNKNOWN"`.
    pub fn normalize(&self) -> Option<CatalogEntry> {
        let hex = [&self.hex_code, &self.extracted_hex, &self.hex]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())?;
        let rgb = RgbColor::from_hex(hex).ok()?;

        let code = self
            .code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(UNKNOWN_CODE);
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();

        Some(CatalogEntry {
            code: code.to_string(),
            name: name.to_string(),
            hex: rgb.to_hex(),
            swatch_url: self.swatch_img.as_ref().and_then(swatch_reference),
        })
    }
}

/// Extracts a swatch URL from a string or `{url, path}` object.
fn swatch_reference(value: &Value) -> Option<String> {
    let candidate = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["url", "path"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty()),
        _ => None,
    }?;

    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Unwraps a catalog payload into its list of records.
///
/// Accepts a bare array, or an object holding the array under `items`,
/// `results` or `data`. Anything else yields an empty list. Elements that are
/// not objects are dropped here; field-level validation happens in
/// [`RawCatalogRecord::normalize`].
pub fn records_from_payload(payload: Value) -> Vec<RawCatalogRecord> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(mut map) => ["items", "results", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    rows.into_iter()
        .filter(Value::is_object)
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawCatalogRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_prefers_hex_code() {
        let entry = raw(json!({
            "code": " 18-1664 TPX ",
            "name": "Fiery Red",
            "hex_code": "bd2c27",
            "extracted_hex": "#000000"
        }))
        .normalize()
        .unwrap();

        assert_eq!(entry.code, "18-1664 TPX");
        assert_eq!(entry.name, "Fiery Red");
        assert_eq!(entry.hex, "#BD2C27");
        assert_eq!(entry.swatch_url, None);
    }

    #[test]
    fn test_normalize_falls_through_blank_hex_fields() {
        let entry = raw(json!({"code": "A", "hex_code": "  ", "extracted_hex": "#336699"}))
            .normalize()
            .unwrap();
        assert_eq!(entry.hex, "#336699");

        let entry = raw(json!({"code": "B", "hex": "00ff00"})).normalize().unwrap();
        assert_eq!(entry.hex, "#00FF00");
    }

    #[test]
    fn test_normalize_defaults_code() {
        let entry = raw(json!({"hex": "#FFFFFF"})).normalize().unwrap();
        assert_eq!(entry.code, "UNKNOWN");
        assert_eq!(entry.name, "");

        let entry = raw(json!({"code": "   ", "hex": "#FFFFFF"})).normalize().unwrap();
        assert_eq!(entry.code, "UNKNOWN");
    }

    #[test]
    fn test_normalize_rejects_invalid_hex() {
        assert!(raw(json!({"code": "X"})).normalize().is_none());
        assert!(raw(json!({"code": "X", "hex_code": ""})).normalize().is_none());
        assert!(raw(json!({"code": "X", "hex_code": "#12345"})).normalize().is_none());
        assert!(raw(json!({"code": "X", "hex_code": "zzzzzz"})).normalize().is_none());
    }

    #[test]
    fn test_swatch_reference_shapes() {
        let entry = raw(json!({"hex": "#FFFFFF", "swatch_img": {"url": "https://cdn/x.png", "path": "/x.png"}}))
            .normalize()
            .unwrap();
        assert_eq!(entry.swatch_url.as_deref(), Some("https://cdn/x.png"));

        let entry = raw(json!({"hex": "#FFFFFF", "swatch_img": {"url": " ", "path": "/x.png"}}))
            .normalize()
            .unwrap();
        assert_eq!(entry.swatch_url.as_deref(), Some("/x.png"));

        let entry = raw(json!({"hex": "#FFFFFF", "swatch_img": " img/a.jpg "}))
            .normalize()
            .unwrap();
        assert_eq!(entry.swatch_url.as_deref(), Some("img/a.jpg"));

        let entry = raw(json!({"hex": "#FFFFFF", "swatch_img": 42})).normalize().unwrap();
        assert_eq!(entry.swatch_url, None);
    }

    #[test]
    fn test_records_from_payload_envelopes() {
        let rows = json!([{"code": "A", "hex": "#000001"}, {"code": "B", "hex": "#000002"}]);
        assert_eq!(records_from_payload(rows.clone()).len(), 2);
        assert_eq!(records_from_payload(json!({"items": rows.clone()})).len(), 2);
        assert_eq!(records_from_payload(json!({"results": rows.clone()})).len(), 2);
        assert_eq!(records_from_payload(json!({"data": rows})).len(), 2);
        assert!(records_from_payload(json!({"other": []})).is_empty());
        assert!(records_from_payload(json!("text")).is_empty());
        assert!(records_from_payload(Value::Null).is_empty());
    }

    #[test]
    fn test_records_from_payload_skips_non_objects() {
        let rows = json!([{"code": "A", "hex": "#000001"}, 7, "x", null]);
        assert_eq!(records_from_payload(rows).len(), 1);
    }
}
