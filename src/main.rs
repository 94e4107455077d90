//! ChromaMatch - match colors against a reference catalog
//!
//! Command-line front end for the matching library: hex and image queries,
//! catalog lookup and status, and configuration management.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chromamatch::cli::{
    CatalogStatusArgs, CliResult, ConfigArgs, GlobalArgs, HexArgs, ImageArgs, LookupArgs,
};
use chromamatch::constants::APP_BINARY_NAME;

/// ChromaMatch - perceptual color matching against a reference catalog
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match a hex color against the catalog
    Hex(HexArgs),
    /// Extract the dominant color of an image and match it
    Image(ImageArgs),
    /// Show a catalog color by its code
    Lookup(LookupArgs),
    /// Load the catalog and report its status
    Catalog(CatalogStatusArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        match self {
            Self::Hex(args) => args.execute(global),
            Self::Image(args) => args.execute(global),
            Self::Lookup(args) => args.execute(global),
            Self::Catalog(args) => args.execute(global),
            Self::Config(args) => args.execute(global),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = cli.command.execute(&cli.global) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
