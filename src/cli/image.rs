//! `image` command: extract the dominant color of a photo and match it.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{print_json, CliError, CliResult, GlobalArgs};
use crate::cli::hex::print_report;
use crate::services::ImageMatchParams;

/// Extract the dominant color of an image and match it against the catalog
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image file (PNG, JPEG, WebP, GIF or BMP)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Number of matches to return (1-20)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Number of color clusters (1-8)
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Darken the extracted color to compensate for fabric sheen
    #[arg(long, value_name = "BOOL")]
    fabric_mode: Option<bool>,

    /// Multiply the extracted lightness before matching
    #[arg(long, value_name = "FACTOR")]
    lightness_boost: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl ImageArgs {
    /// Execute image command
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        let bytes = fs::read(&self.file).map_err(|e| {
            CliError::io(format!(
                "Failed to read image {}: {}",
                self.file.display(),
                e
            ))
        })?;

        let (config, matcher) = global.matcher()?;
        let matching = &config.matching;
        let params = ImageMatchParams {
            n_clusters: self.clusters.unwrap_or(matching.n_clusters),
            fabric_mode: self.fabric_mode.unwrap_or(matching.fabric_mode),
            lightness_boost: self
                .lightness_boost
                .unwrap_or(matching.image_lightness_boost),
        };
        let limit = self.limit.unwrap_or(matching.default_limit);

        let report = matcher.match_image(&bytes, limit, params)?;

        if self.json {
            return print_json(&report);
        }

        println!(
            "Extracted {} from {} ({} clusters, fabric compensation {}, lightness x{})",
            report.extracted_hex,
            self.file.display(),
            report.params.n_clusters,
            report.compensation.as_str().replace('_', " "),
            report.params.lightness_boost
        );
        if let Some(reason) = report.compensation.reason() {
            eprintln!("Note: fabric compensation skipped: {reason}");
        }
        print_report(&report.report);
        Ok(())
    }
}
