//! `hex` command: match a hex color against the catalog.

use clap::Args;

use crate::cli::common::{print_json, print_warning, CliResult, GlobalArgs};
use crate::models::MatchResult;
use crate::services::MatchReport;

/// Match a hex color against the catalog
#[derive(Args, Debug)]
pub struct HexArgs {
    /// Color as #RRGGBB or RRGGBB
    #[arg(value_name = "HEX")]
    hex: String,

    /// Number of matches to return (1-20)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Multiply the input lightness before matching
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    lightness_boost: f64,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl HexArgs {
    /// Execute hex command
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        let (config, matcher) = global.matcher()?;
        let limit = self.limit.unwrap_or(config.matching.default_limit);

        let report = matcher.match_hex(&self.hex, limit, self.lightness_boost)?;

        if self.json {
            print_json(&report)
        } else {
            print_report(&report);
            Ok(())
        }
    }
}

/// Prints a match report as a table.
pub(crate) fn print_report(report: &MatchReport) {
    print_warning(report.warning.as_deref());
    println!(
        "Input {} | metric {} | catalog {} | {} colors compared",
        report.input_hex, report.metric, report.catalog_source, report.total_compared
    );
    println!();

    if report.results.is_empty() {
        println!("No catalog colors to compare against.");
        return;
    }

    println!(
        "{:>3}  {:<16} {:<28} {:<8} {:>8} {:>10}",
        "#", "Code", "Name", "Hex", "Delta E", "Similarity"
    );
    for (rank, result) in report.results.iter().enumerate() {
        print_row(rank + 1, result);
    }
}

fn print_row(rank: usize, result: &MatchResult) {
    println!(
        "{:>3}  {:<16} {:<28} {:<8} {:>8.3} {:>9.2}%",
        rank,
        truncate(&result.code, 16),
        truncate(&result.name, 28),
        result.hex,
        result.delta_e,
        result.similarity
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('~');
    shortened
}
