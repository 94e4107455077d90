//! Shared CLI plumbing: error type, exit codes, global options and output helpers.

use std::fmt;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::config::{CatalogSourceKind, Config};
use crate::error::MatchError;
use crate::services::ColorMatcher;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input, or the query had no result
    Validation = 1,
    /// File, network or serialization failure
    Io = 2,
}

/// Error reported by a CLI command.
#[derive(Debug)]
pub struct CliError {
    code: ExitCode,
    message: String,
}

impl CliError {
    /// Invalid input or an expected "no result" outcome (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// I/O or environment failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Exit code category.
    pub fn code(&self) -> ExitCode {
        self.code
    }

    /// Numeric process exit code.
    pub fn exit_code(&self) -> i32 {
        self.code as i32
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<MatchError> for CliError {
    fn from(err: MatchError) -> Self {
        Self::validation(err.to_string())
    }
}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file to use instead of the platform default
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Primary catalog source, overriding config and environment
    #[arg(long, value_enum, value_name = "SOURCE", global = true)]
    pub source: Option<CatalogSourceKind>,

    /// Local catalog JSON file, overriding config and environment
    #[arg(long, value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,
}

impl GlobalArgs {
    /// Path of the config file in effect.
    pub fn config_path(&self) -> CliResult<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path()
                .map_err(|e| CliError::io(format!("Failed to locate configuration: {e:#}"))),
        }
    }

    /// Loads the configuration with environment and flag overrides applied.
    pub fn load_config(&self) -> CliResult<Config> {
        let path = self.config_path()?;
        let mut config = Config::load_from(&path)
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if let Some(source) = self.source {
            config.catalog.source = source;
        }
        if let Some(catalog) = &self.catalog {
            config.catalog.local_path = Some(catalog.clone());
        }
        Ok(config)
    }

    /// Builds a matcher from the effective configuration.
    pub fn matcher(&self) -> CliResult<(Config, ColorMatcher)> {
        let config = self.load_config()?;
        let matcher = ColorMatcher::from_config(&config)
            .map_err(|e| CliError::io(format!("Failed to set up catalog: {e:#}")))?;
        Ok((config, matcher))
    }
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Prints a catalog warning to stderr, if there is one.
pub fn print_warning(warning: Option<&str>) {
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }
}
