//! Dominant-color extraction from photographed swatches.
//!
//! The pipeline decodes the image, downsamples it to a fixed 100x100 grid,
//! drops near-white background and near-black shadow pixels, clusters the rest
//! with seeded k-means and reports the centroid of the most populated cluster.
//! An optional fabric compensation darkens the result in Lab space to undo the
//! extra reflectance of photographed textiles.

pub mod kmeans;

use image::imageops::FilterType;
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{MAX_CLUSTERS, MIN_CLUSTERS};
use crate::error::{ConversionError, ExtractionError};
use crate::models::RgbColor;

pub use kmeans::{kmeans, Clustering, KMeansParams};

/// Tunables of the extraction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorSettings {
    /// Side length of the square grid images are resampled to
    pub sample_size: u32,
    /// Pixels with every channel above this are background
    pub white_threshold: u8,
    /// Pixels with every channel below this are shadow
    pub black_threshold: u8,
    /// Lightness multiplier of fabric compensation
    pub fabric_lightness: f64,
    /// a*/b* multiplier of fabric compensation
    pub fabric_chroma: f64,
    /// Clustering budget
    pub kmeans: KMeansParams,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            sample_size: 100,
            white_threshold: 240,
            black_threshold: 10,
            fabric_lightness: 0.88,
            fabric_chroma: 0.98,
            kmeans: KMeansParams::default(),
        }
    }
}

/// What happened to the fabric compensation step.
///
/// Serializes as its status string; the skip reason is available through
/// [`Compensation::reason`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Fabric mode was off
    NotRequested,
    /// The compensated color is reported
    Applied,
    /// Compensation failed; the uncompensated color is reported
    Skipped(String),
}

impl Compensation {
    /// Status string: "not_requested", "applied" or "skipped".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRequested => "not_requested",
            Self::Applied => "applied",
            Self::Skipped(_) => "skipped",
        }
    }

    /// Why compensation was skipped, if it was.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

impl Serialize for Compensation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A successfully extracted dominant color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Reported color (compensated when compensation was applied)
    pub color: RgbColor,
    /// Dominant cluster centroid before compensation
    pub uncompensated: RgbColor,
    /// Outcome of fabric compensation
    pub compensation: Compensation,
    /// Number of clusters actually used
    pub clusters: usize,
    /// Pixels that went into clustering
    pub pixels_used: usize,
}

impl Extraction {
    /// The reported color as "#RRGGBB".
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

/// Finds the dominant color of an image.
///
/// Stateless apart from its settings; safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct DominantColorExtractor {
    settings: ExtractorSettings,
}

impl DominantColorExtractor {
    /// Creates an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor with custom settings.
    pub fn with_settings(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    /// Returns the active settings.
    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Extracts the dominant color from encoded image bytes.
    ///
    /// `clusters` is clamped to 1..=8.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::Decode`] if the bytes are not a supported raster
    /// image, [`ExtractionError::NoPixels`] if the image is empty.
    pub fn extract(
        &self,
        bytes: &[u8],
        clusters: usize,
        fabric_mode: bool,
    ) -> Result<Extraction, ExtractionError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| ExtractionError::Decode(e.to_string()))?;
        self.extract_from_image(&image, clusters, fabric_mode)
    }

    /// Extracts the dominant color from an already decoded image.
    pub fn extract_from_image(
        &self,
        image: &DynamicImage,
        clusters: usize,
        fabric_mode: bool,
    ) -> Result<Extraction, ExtractionError> {
        let pixels = self.sample_pixels(image)?;
        let points: Vec<kmeans::Point> = self
            .filter_background(&pixels)
            .iter()
            .map(|p| [f64::from(p.r), f64::from(p.g), f64::from(p.b)])
            .collect();

        let requested = clusters.clamp(MIN_CLUSTERS, MAX_CLUSTERS);
        let clustering =
            kmeans(&points, requested, &self.settings.kmeans).ok_or(ExtractionError::NoPixels)?;
        let dominant = clustering.dominant().ok_or(ExtractionError::NoPixels)?;
        let uncompensated = centroid_color(clustering.centroids[dominant]);

        debug!(
            pixels = points.len(),
            clusters = clustering.centroids.len(),
            dominant_count = clustering.counts[dominant],
            color = %uncompensated,
            "Extracted dominant color"
        );

        let (color, compensation) = if fabric_mode {
            match self.compensate(uncompensated) {
                Ok(adjusted) => (adjusted, Compensation::Applied),
                Err(e) => {
                    warn!("Fabric compensation skipped for {}: {}", uncompensated, e);
                    (uncompensated, Compensation::Skipped(e.to_string()))
                }
            }
        } else {
            (uncompensated, Compensation::NotRequested)
        };

        Ok(Extraction {
            color,
            uncompensated,
            compensation,
            clusters: clustering.centroids.len(),
            pixels_used: points.len(),
        })
    }

    /// Applies fabric compensation: Lab lightness x0.88, a*/b* x0.98.
    pub fn compensate(&self, color: RgbColor) -> Result<RgbColor, ConversionError> {
        color
            .to_lab()
            .scaled(self.settings.fabric_lightness, self.settings.fabric_chroma)
            .to_rgb()
    }

    /// Resamples to the fixed grid and returns its pixels in row order.
    fn sample_pixels(&self, image: &DynamicImage) -> Result<Vec<RgbColor>, ExtractionError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ExtractionError::NoPixels);
        }

        let size = self.settings.sample_size;
        let rgb = if (image.width(), image.height()) == (size, size) {
            image.to_rgb8()
        } else {
            image.resize_exact(size, size, FilterType::Lanczos3).to_rgb8()
        };

        let pixels: Vec<RgbColor> = rgb.pixels().map(|p| RgbColor::from(p.0)).collect();
        if pixels.is_empty() {
            return Err(ExtractionError::NoPixels);
        }
        Ok(pixels)
    }

    /// Drops background and shadow pixels, keeping everything if nothing survives.
    fn filter_background(&self, pixels: &[RgbColor]) -> Vec<RgbColor> {
        let kept: Vec<RgbColor> = pixels
            .iter()
            .copied()
            .filter(|p| {
                !p.all_above(self.settings.white_threshold)
                    && !p.all_below(self.settings.black_threshold)
            })
            .collect();

        if kept.is_empty() {
            debug!("Background filter removed every pixel, using the unfiltered set");
            pixels.to_vec()
        } else {
            kept
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn centroid_color(centroid: kmeans::Point) -> RgbColor {
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    RgbColor::new(channel(centroid[0]), channel(centroid[1]), channel(centroid[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(image: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn swatch_with_white_border(size: u32, color: [u8; 3], white_rows: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |_, y| {
            if y < white_rows {
                Rgb([255, 255, 255])
            } else {
                Rgb(color)
            }
        })
    }

    #[test]
    fn test_background_does_not_dominate() {
        let bytes = encode_png(swatch_with_white_border(100, [0x33, 0x66, 0x99], 10));
        let extraction = DominantColorExtractor::new().extract(&bytes, 3, false).unwrap();

        assert_eq!(extraction.hex(), "#336699");
        assert_eq!(extraction.compensation, Compensation::NotRequested);
        assert_eq!(extraction.pixels_used, 9000);
    }

    #[test]
    fn test_shadow_pixels_filtered() {
        let image = RgbImage::from_fn(100, 100, |x, _| {
            if x < 30 {
                Rgb([2, 3, 1])
            } else {
                Rgb([180, 40, 60])
            }
        });
        let extraction = DominantColorExtractor::new()
            .extract(&encode_png(image), 3, false)
            .unwrap();
        assert_eq!(extraction.color, RgbColor::new(180, 40, 60));
    }

    #[test]
    fn test_all_background_falls_back_to_unfiltered() {
        let image = RgbImage::from_pixel(100, 100, Rgb([250, 250, 250]));
        let extraction = DominantColorExtractor::new()
            .extract(&encode_png(image), 3, false)
            .unwrap();
        assert_eq!(extraction.color, RgbColor::new(250, 250, 250));
        assert_eq!(extraction.pixels_used, 10_000);
    }

    #[test]
    fn test_most_populated_cluster_wins() {
        let image = RgbImage::from_fn(100, 100, |x, _| match x {
            0..=19 => Rgb([200, 30, 30]),
            20..=49 => Rgb([30, 200, 30]),
            _ => Rgb([30, 30, 200]),
        });
        let extraction = DominantColorExtractor::new()
            .extract(&encode_png(image), 3, false)
            .unwrap();
        assert_eq!(extraction.color, RgbColor::new(30, 30, 200));
    }

    #[test]
    fn test_single_cluster_is_mean_color() {
        let image = RgbImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgb([100, 100, 100])
            } else {
                Rgb([200, 100, 50])
            }
        });
        let extraction = DominantColorExtractor::new()
            .extract(&encode_png(image), 1, false)
            .unwrap();
        assert_eq!(extraction.color, RgbColor::new(150, 100, 75));
        assert_eq!(extraction.clusters, 1);
    }

    #[test]
    fn test_cluster_count_is_clamped() {
        let image = RgbImage::from_pixel(100, 100, Rgb([10, 120, 90]));
        let bytes = encode_png(image);
        let extractor = DominantColorExtractor::new();
        assert_eq!(extractor.extract(&bytes, 0, false).unwrap().clusters, 1);
        assert_eq!(extractor.extract(&bytes, 50, false).unwrap().clusters, 8);
    }

    #[test]
    fn test_resamples_other_sizes() {
        let image = RgbImage::from_pixel(37, 250, Rgb([120, 60, 30]));
        let extraction = DominantColorExtractor::new()
            .extract(&encode_png(image), 3, false)
            .unwrap();
        assert_eq!(extraction.color, RgbColor::new(120, 60, 30));
        assert_eq!(extraction.pixels_used, 10_000);
    }

    #[test]
    fn test_fabric_mode_darkens() {
        let bytes = encode_png(swatch_with_white_border(100, [0x33, 0x66, 0x99], 10));
        let extractor = DominantColorExtractor::new();
        let plain = extractor.extract(&bytes, 3, false).unwrap();
        let fabric = extractor.extract(&bytes, 3, true).unwrap();

        assert_eq!(fabric.compensation, Compensation::Applied);
        assert_eq!(fabric.uncompensated, plain.color);
        assert!(fabric.color.to_lab().l < plain.color.to_lab().l);
    }

    #[test]
    fn test_fabric_mode_never_lightens() {
        let extractor = DominantColorExtractor::new();
        for rgb in [
            [0x33, 0x66, 0x99],
            [0xBD, 0x2C, 0x27],
            [0x00, 0x00, 0xFF],
            [0xF0, 0xE6, 0x8C],
            [0x20, 0x20, 0x20],
            [0x7F, 0xFF, 0x00],
        ] {
            let color = RgbColor::from(rgb);
            let compensated = extractor.compensate(color).unwrap();
            assert!(
                compensated.to_lab().l <= color.to_lab().l,
                "{} lightened to {}",
                color,
                compensated
            );
        }
    }

    #[test]
    fn test_compensation_failure_reports_uncompensated() {
        let settings = ExtractorSettings {
            fabric_lightness: f64::NAN,
            ..ExtractorSettings::default()
        };
        let image = RgbImage::from_pixel(100, 100, Rgb([0x33, 0x66, 0x99]));
        let extraction = DominantColorExtractor::with_settings(settings)
            .extract(&encode_png(image), 3, true)
            .unwrap();

        assert_eq!(extraction.color, RgbColor::new(0x33, 0x66, 0x99));
        assert!(matches!(extraction.compensation, Compensation::Skipped(_)));
        assert_eq!(extraction.compensation.as_str(), "skipped");
        assert!(extraction.compensation.reason().is_some());
    }

    #[test]
    fn test_compensation_serializes_as_status() {
        assert_eq!(
            serde_json::to_value(Compensation::Applied).unwrap(),
            serde_json::json!("applied")
        );
        assert_eq!(
            serde_json::to_value(Compensation::Skipped("nan".into())).unwrap(),
            serde_json::json!("skipped")
        );
    }

    #[test]
    fn test_undecodable_bytes() {
        let result = DominantColorExtractor::new().extract(b"definitely not an image", 3, false);
        assert!(matches!(result, Err(ExtractionError::Decode(_))));

        let result = DominantColorExtractor::new().extract(&[], 3, false);
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }
}
