//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution. Environment
//! variables override file values; command-line flags override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{
    APP_NAME, DEFAULT_CACHE_TTL_SECS, DEFAULT_CLUSTERS, DEFAULT_IMAGE_LIGHTNESS_BOOST,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RESULT_LIMIT, MAX_CLUSTERS, MAX_RESULT_LIMIT,
    MIN_CLUSTERS,
};

/// Overrides the platform config directory.
pub const ENV_CONFIG_DIR: &str = "CHROMAMATCH_CONFIG_DIR";
/// Overrides `catalog.source` ("remote" or "local").
pub const ENV_CATALOG_SOURCE: &str = "CHROMAMATCH_CATALOG_SOURCE";
/// Overrides `catalog.remote_url`.
pub const ENV_REMOTE_URL: &str = "CHROMAMATCH_REMOTE_URL";
/// Overrides `catalog.api_key`.
pub const ENV_API_KEY: &str = "CHROMAMATCH_API_KEY";
/// Overrides `catalog.local_path`.
pub const ENV_CATALOG_PATH: &str = "CHROMAMATCH_CATALOG_PATH";
/// Overrides `catalog.cache_ttl_secs`.
pub const ENV_CACHE_TTL: &str = "CHROMAMATCH_CACHE_TTL_SECONDS";

/// Which catalog source is primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    /// Remote service, with the local file as fallback
    #[default]
    Remote,
    /// Local JSON file only
    Local,
}

impl fmt::Display for CatalogSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Local => f.write_str("local"),
        }
    }
}

impl FromStr for CatalogSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            other => anyhow::bail!("Invalid catalog source '{other}'. Must be 'remote' or 'local'"),
        }
    }
}

/// Catalog source and cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Primary catalog source
    pub source: CatalogSourceKind,
    /// Base URL of the remote catalog service (e.g., "https://api.example.com/v1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Bearer token for the remote service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Local catalog JSON file; defaults to `<config dir>/catalog.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    /// Seconds a loaded catalog stays fresh (minimum 1)
    pub cache_ttl_secs: u64,
    /// Remote request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSourceKind::default(),
            remote_url: None,
            api_key: None,
            local_path: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Query defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Results returned when no limit is given
    pub default_limit: usize,
    /// Upper bound on results per query (at most 20)
    pub max_limit: usize,
    /// Default k-means cluster count for images
    pub n_clusters: usize,
    /// Apply fabric compensation to images by default
    pub fabric_mode: bool,
    /// Default lightness boost for image queries
    pub image_lightness_boost: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_RESULT_LIMIT,
            max_limit: MAX_RESULT_LIMIT,
            n_clusters: DEFAULT_CLUSTERS,
            fabric_mode: true,
            image_lightness_boost: DEFAULT_IMAGE_LIGHTNESS_BOOST,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ChromaMatch/config.toml`
/// - macOS: `~/Library/Application Support/ChromaMatch/config.toml`
/// - Windows: `%APPDATA%\ChromaMatch\config.toml`
///
/// `CHROMAMATCH_CONFIG_DIR` replaces the directory on every platform.
///
/// # Validation
///
/// - `cache_ttl_secs` and `request_timeout_secs` must be at least 1
/// - `remote_url`, if set, must be an http(s) URL
/// - `max_limit` must be within 1..=20 and `default_limit` within 1..=`max_limit`
/// - `n_clusters` must be within 1..=8
/// - `image_lightness_boost` must be a positive number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Catalog source settings
    pub catalog: CatalogConfig,
    /// Query defaults
    pub matching: MatchingConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// - Linux: `~/.config/ChromaMatch/`
    /// - macOS: `~/Library/Application Support/ChromaMatch/`
    /// - Windows: `%APPDATA%\ChromaMatch\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Local catalog file: the configured path or `<config dir>/catalog.json`.
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog.local_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("catalog.json")),
        }
    }

    /// Loads configuration from the default config file, then applies
    /// environment overrides.
    ///
    /// If the file doesn't exist, starts from the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `path`, then applies environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file without environment overrides.
    pub fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .context(format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Applies `CHROMAMATCH_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name. Blank values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(source) = get(ENV_CATALOG_SOURCE) {
            self.catalog.source = source
                .parse()
                .context(format!("Invalid value for {ENV_CATALOG_SOURCE}"))?;
        }
        if let Some(url) = get(ENV_REMOTE_URL) {
            self.catalog.remote_url = Some(url.trim().to_string());
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.catalog.api_key = Some(key.trim().to_string());
        }
        if let Some(path) = get(ENV_CATALOG_PATH) {
            self.catalog.local_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(ttl) = get(ENV_CACHE_TTL) {
            let ttl: u64 = ttl
                .trim()
                .parse()
                .context(format!("Invalid value for {ENV_CACHE_TTL}: expected seconds"))?;
            self.catalog.cache_ttl_secs = ttl.max(1);
        }

        Ok(())
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let catalog = &self.catalog;
        if catalog.cache_ttl_secs == 0 {
            anyhow::bail!("catalog.cache_ttl_secs must be at least 1");
        }
        if catalog.request_timeout_secs == 0 {
            anyhow::bail!("catalog.request_timeout_secs must be at least 1");
        }
        if let Some(url) = &catalog.remote_url {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("catalog.remote_url must start with http:// or https://, got '{url}'");
            }
        }

        let matching = &self.matching;
        if !(1..=MAX_RESULT_LIMIT).contains(&matching.max_limit) {
            anyhow::bail!("matching.max_limit must be between 1 and {MAX_RESULT_LIMIT}");
        }
        if !(1..=matching.max_limit).contains(&matching.default_limit) {
            anyhow::bail!(
                "matching.default_limit must be between 1 and {}",
                matching.max_limit
            );
        }
        if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&matching.n_clusters) {
            anyhow::bail!("matching.n_clusters must be between {MIN_CLUSTERS} and {MAX_CLUSTERS}");
        }
        if !(matching.image_lightness_boost.is_finite() && matching.image_lightness_boost > 0.0) {
            anyhow::bail!("matching.image_lightness_boost must be a positive number");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.catalog.source, CatalogSourceKind::Remote);
        assert_eq!(config.catalog.remote_url, None);
        assert_eq!(config.catalog.cache_ttl_secs, 60);
        assert_eq!(config.catalog.request_timeout_secs, 20);
        assert_eq!(config.matching.default_limit, 5);
        assert_eq!(config.matching.max_limit, 20);
        assert_eq!(config.matching.n_clusters, 3);
        assert!(config.matching.fabric_mode);
        assert!((config.matching.image_lightness_boost - 1.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_validate() {
        assert!(Config::new().validate().is_ok());

        let mut config = Config::new();
        config.catalog.cache_ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.catalog.remote_url = Some("ftp://catalog".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.matching.max_limit = 21;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.matching.max_limit = 4;
        assert!(config.validate().is_err(), "default_limit 5 exceeds max_limit 4");

        let mut config = Config::new();
        config.matching.n_clusters = 9;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.matching.image_lightness_boost = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.catalog.source = CatalogSourceKind::Local;
        config.catalog.remote_url = Some("https://api.example.com/v1".to_string());
        config.catalog.local_path = Some(PathBuf::from("/data/catalog.json"));
        config.catalog.cache_ttl_secs = 300;
        config.matching.fabric_mode = false;

        config.save_to(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        let loaded = Config::read_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::read_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[catalog]\nsource = \"local\"\n").unwrap();

        let loaded = Config::read_file(&path).unwrap();
        assert_eq!(loaded.catalog.source, CatalogSourceKind::Local);
        assert_eq!(loaded.catalog.cache_ttl_secs, 60);
        assert_eq!(loaded.matching, MatchingConfig::default());
    }

    #[test]
    fn test_config_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        fs::write(&path, "[catalog\n").unwrap();
        assert!(Config::read_file(&path).is_err());

        fs::write(&path, "[catalog]\nsource = \"ftp\"\n").unwrap();
        assert!(Config::read_file(&path).is_err());

        fs::write(&path, "[matching]\nn_clusters = 12\n").unwrap();
        assert!(Config::read_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::new();
        config
            .apply_overrides_from(lookup(&[
                (ENV_CATALOG_SOURCE, "LOCAL"),
                (ENV_REMOTE_URL, " https://remote.example.com "),
                (ENV_API_KEY, "token"),
                (ENV_CATALOG_PATH, "/tmp/catalog.json"),
                (ENV_CACHE_TTL, "0"),
            ]))
            .unwrap();

        assert_eq!(config.catalog.source, CatalogSourceKind::Local);
        assert_eq!(
            config.catalog.remote_url.as_deref(),
            Some("https://remote.example.com")
        );
        assert_eq!(config.catalog.api_key.as_deref(), Some("token"));
        assert_eq!(
            config.catalog.local_path,
            Some(PathBuf::from("/tmp/catalog.json"))
        );
        assert_eq!(config.catalog.cache_ttl_secs, 1, "TTL has a floor of one second");
    }

    #[test]
    fn test_env_overrides_ignore_blank_values() {
        let mut config = Config::new();
        config
            .apply_overrides_from(lookup(&[(ENV_REMOTE_URL, "  "), (ENV_CATALOG_SOURCE, "")]))
            .unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_env_overrides_reject_invalid_values() {
        let mut config = Config::new();
        assert!(config
            .apply_overrides_from(lookup(&[(ENV_CACHE_TTL, "soon")]))
            .is_err());
        assert!(config
            .apply_overrides_from(lookup(&[(ENV_CATALOG_SOURCE, "sqlite")]))
            .is_err());
    }

    #[test]
    fn test_catalog_path_prefers_configured() {
        let mut config = Config::new();
        config.catalog.local_path = Some(PathBuf::from("/srv/catalog.json"));
        assert_eq!(
            config.catalog_path().unwrap(),
            PathBuf::from("/srv/catalog.json")
        );
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(
            "remote".parse::<CatalogSourceKind>().unwrap(),
            CatalogSourceKind::Remote
        );
        assert_eq!(
            " Local ".parse::<CatalogSourceKind>().unwrap(),
            CatalogSourceKind::Local
        );
        assert!("xano".parse::<CatalogSourceKind>().is_err());
        assert_eq!(CatalogSourceKind::Local.to_string(), "local");
    }
}
