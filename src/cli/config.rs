//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult, GlobalArgs};
use crate::config::{CatalogSourceKind, Config};
use crate::constants::APP_NAME;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
///
/// The catalog source is set with the global `--source` flag.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Base URL of the remote catalog service
    #[arg(long, value_name = "URL")]
    remote_url: Option<String>,

    /// Local catalog JSON file
    #[arg(long, value_name = "FILE")]
    local_path: Option<PathBuf>,

    /// Catalog cache lifetime in seconds
    #[arg(long, value_name = "SECONDS")]
    ttl: Option<u64>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: String,
    catalog: CatalogOutput,
    matching: MatchingOutput,
}

#[derive(Serialize, Debug)]
struct CatalogOutput {
    source: CatalogSourceKind,
    remote_url: Option<String>,
    api_key_set: bool,
    local_path: Option<String>,
    cache_ttl_secs: u64,
    request_timeout_secs: u64,
}

#[derive(Serialize, Debug)]
struct MatchingOutput {
    default_limit: usize,
    max_limit: usize,
    n_clusters: usize,
    fabric_mode: bool,
    image_lightness_boost: f64,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(global),
            ConfigCommand::Set(args) => args.execute(global),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        let path = global.config_path()?;
        let config = global.load_config()?;
        let output = ConfigOutput::new(&config, &path);

        if self.json {
            print_json(&output)
        } else {
            output_human_readable(&output);
            Ok(())
        }
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        // At least one argument must be provided
        if global.source.is_none()
            && self.remote_url.is_none()
            && self.local_path.is_none()
            && self.ttl.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --source, --remote-url, --local-path, or --ttl",
            ));
        }

        // Start from the file alone so environment overrides are not persisted
        let path = global.config_path()?;
        let mut config = Config::read_file(&path)
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if let Some(source) = global.source {
            config.catalog.source = source;
        }
        if let Some(url) = &self.remote_url {
            config.catalog.remote_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
        }
        if let Some(local_path) = &self.local_path {
            config.catalog.local_path = Some(local_path.clone());
        }
        if let Some(ttl) = self.ttl {
            if ttl == 0 {
                return Err(CliError::validation("Cache TTL must be at least 1 second"));
            }
            config.catalog.cache_ttl_secs = ttl;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e:#}")))?;
        config
            .save_to(&path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

impl ConfigOutput {
    fn new(config: &Config, path: &Path) -> Self {
        let catalog = &config.catalog;
        let matching = &config.matching;
        Self {
            config_file: path.to_string_lossy().to_string(),
            catalog: CatalogOutput {
                source: catalog.source,
                remote_url: catalog.remote_url.clone(),
                api_key_set: catalog.api_key.is_some(),
                local_path: config
                    .catalog_path()
                    .ok()
                    .map(|p| p.to_string_lossy().to_string()),
                cache_ttl_secs: catalog.cache_ttl_secs,
                request_timeout_secs: catalog.request_timeout_secs,
            },
            matching: MatchingOutput {
                default_limit: matching.default_limit,
                max_limit: matching.max_limit,
                n_clusters: matching.n_clusters,
                fabric_mode: matching.fabric_mode,
                image_lightness_boost: matching.image_lightness_boost,
            },
        }
    }
}

/// Output configuration in human-readable format
fn output_human_readable(output: &ConfigOutput) {
    println!("{APP_NAME} Configuration");
    println!("========================");
    println!("Config file: {}", output.config_file);
    println!();

    let catalog = &output.catalog;
    println!("Catalog:");
    println!("  Source: {}", catalog.source);
    println!(
        "  Remote URL: {}",
        catalog.remote_url.as_deref().unwrap_or("(not configured)")
    );
    println!(
        "  API key: {}",
        if catalog.api_key_set { "(set)" } else { "(not set)" }
    );
    println!(
        "  Local file: {}",
        catalog.local_path.as_deref().unwrap_or("(unknown)")
    );
    println!("  Cache TTL: {}s", catalog.cache_ttl_secs);
    println!("  Request timeout: {}s", catalog.request_timeout_secs);
    println!();

    let matching = &output.matching;
    println!("Matching:");
    println!("  Default limit: {}", matching.default_limit);
    println!("  Max limit: {}", matching.max_limit);
    println!("  Clusters: {}", matching.n_clusters);
    println!("  Fabric mode: {}", matching.fabric_mode);
    println!("  Image lightness boost: {}", matching.image_lightness_boost);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_hides_api_key() {
        let mut config = Config::new();
        config.catalog.api_key = Some("secret-token".to_string());
        config.catalog.local_path = Some(PathBuf::from("/srv/catalog.json"));

        let output = ConfigOutput::new(&config, Path::new("/etc/chromamatch.toml"));
        let json = serde_json::to_string(&output).unwrap();

        assert!(!json.contains("secret-token"));
        assert!(json.contains("\"api_key_set\":true"));
        assert!(json.contains("/srv/catalog.json"));
    }
}
