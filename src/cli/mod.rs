//! CLI command handlers for ChromaMatch.
//!
//! Each subcommand is a clap `Args` struct with an `execute` method returning
//! [`CliResult`]; `main` maps errors to exit codes.

pub mod catalog;
pub mod common;
pub mod config;
pub mod hex;
pub mod image;
pub mod lookup;

// Re-export types used by main.rs and tests
pub use catalog::CatalogStatusArgs;
pub use common::{CliError, CliResult, ExitCode, GlobalArgs};
pub use config::ConfigArgs;
pub use hex::HexArgs;
pub use image::ImageArgs;
pub use lookup::LookupArgs;
