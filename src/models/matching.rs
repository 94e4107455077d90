//! Match results and the reports built around them.

use serde::{Serialize, Serializer};

use crate::models::{CmykColor, LabColor, RgbColor};

/// One ranked catalog entry.
///
/// Produced fresh per query. `delta_e` and `similarity` keep full precision in
/// memory and are rounded only when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Catalog code
    pub code: String,
    /// Catalog color name
    pub name: String,
    /// Catalog hex ("#RRGGBB")
    pub hex: String,
    /// Swatch reference carried over from the catalog entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swatch_url: Option<String>,
    /// CIEDE2000 distance to the query color (>= 0)
    #[serde(serialize_with = "serialize_3dp")]
    pub delta_e: f64,
    /// Display score in 0..=100 derived from `delta_e`
    #[serde(serialize_with = "serialize_2dp")]
    pub similarity: f64,
    /// Catalog color as RGB
    pub rgb: RgbColor,
    /// Catalog color as Lab
    #[serde(serialize_with = "serialize_lab_2dp")]
    pub lab: LabColor,
    /// Catalog color as CMYK percentages
    pub cmyk: CmykColor,
}

/// Rounds to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn serialize_3dp<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 3))
}

fn serialize_2dp<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

fn serialize_lab_2dp<S: Serializer>(lab: &LabColor, serializer: S) -> Result<S::Ok, S::Error> {
    LabColor::new(round_to(lab.l, 2), round_to(lab.a, 2), round_to(lab.b, 2)).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert!((round_to(1.23456, 3) - 1.235).abs() < 1e-12);
        assert!((round_to(1.23456, 2) - 1.23).abs() < 1e-12);
        assert!((round_to(87.5, 0) - 88.0).abs() < 1e-12);
    }

    #[test]
    fn test_serialization_rounds_display_fields() {
        let result = MatchResult {
            code: "A".to_string(),
            name: "Alpha".to_string(),
            hex: "#FF0000".to_string(),
            swatch_url: None,
            delta_e: 1.234_567,
            similarity: 93.827_165,
            rgb: RgbColor::new(255, 0, 0),
            lab: LabColor::new(53.240_79, 80.092_46, 67.203_19),
            cmyk: CmykColor::new(0, 100, 100, 0),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["delta_e"], 1.235);
        assert_eq!(json["similarity"], 93.83);
        assert_eq!(json["lab"]["L"], 53.24);
        assert_eq!(json["lab"]["a"], 80.09);
        assert_eq!(json["rgb"]["r"], 255);
        assert_eq!(json["cmyk"]["k"], 0);
        assert!(json.get("swatch_url").is_none());
    }
}
