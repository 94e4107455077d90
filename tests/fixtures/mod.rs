//! Shared test fixtures for E2E CLI and library tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the chromamatch binary
pub fn chromamatch_bin() -> String {
    std::env::var("CARGO_BIN_EXE_chromamatch")
        .unwrap_or_else(|_| "target/debug/chromamatch".to_string())
}

/// Catalog with the three reference colors A, B and C plus a few
/// well-known entries and one record without a usable hex.
pub fn sample_catalog() -> Value {
    json!({
        "items": [
            {"code": "A", "name": "Red", "hex": "#FF0000"},
            {"code": "B", "name": "Nearly Red", "hex": "#FF0001"},
            {"code": "C", "name": "Green", "hex": "#00FF00"},
            {"code": "19-4052 TCX", "name": "Classic Blue", "hex_code": "0F4C81"},
            {"code": "18-1664 TPX", "name": "Fiery Red", "extracted_hex": "#BD2C27",
             "swatch_img": {"url": "https://example.com/18-1664.png"}},
            {"code": "11-0601 TCX", "name": "Bright White", "hex": "#F4F5F0"},
            {"code": "BROKEN", "name": "No Hex", "hex": ""}
        ]
    })
}

/// An isolated environment: its own config directory and catalog file.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Creates an environment whose catalog is [`sample_catalog`].
    pub fn new() -> Self {
        Self::with_catalog(&sample_catalog())
    }

    /// Creates an environment with the given catalog payload.
    pub fn with_catalog(catalog: &Value) -> Self {
        let env = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        fs::create_dir_all(env.config_dir()).expect("Failed to create config dir");
        fs::write(env.catalog_path(), catalog.to_string()).expect("Failed to write catalog");
        env
    }

    /// Root of the environment.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory used as CHROMAMATCH_CONFIG_DIR.
    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    /// Default config file inside the config directory.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    /// Catalog JSON file of this environment.
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("catalog.json")
    }

    /// Writes an image to the environment and returns its path.
    pub fn write_image(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).expect("Failed to write image");
        path
    }

    /// A command with config isolated to this environment and no
    /// `CHROMAMATCH_*` variables inherited from the caller.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(chromamatch_bin());
        for key in [
            "CHROMAMATCH_CATALOG_SOURCE",
            "CHROMAMATCH_REMOTE_URL",
            "CHROMAMATCH_API_KEY",
            "CHROMAMATCH_CATALOG_PATH",
            "CHROMAMATCH_CACHE_TTL_SECONDS",
            "RUST_LOG",
        ] {
            cmd.env_remove(key);
        }
        cmd.env("CHROMAMATCH_CONFIG_DIR", self.config_dir());
        cmd.args(args);
        cmd
    }

    /// Runs a command against the local catalog file.
    pub fn run_local(&self, args: &[&str]) -> Output {
        let catalog = self.catalog_path();
        let mut full = vec![
            "--source",
            "local",
            "--catalog",
            catalog.to_str().expect("temp path is UTF-8"),
        ];
        full.extend_from_slice(args);
        self.command(&full).output().expect("Failed to execute command")
    }
}

/// Parses stdout as JSON, failing with stderr in the message.
pub fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| {
        panic!(
            "Should parse JSON output ({e}). stdout: {stdout} stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

/// Encodes an RGB image as PNG.
pub fn encode_png(image: RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding succeeds");
    bytes
}

/// 100x100 swatch of `color` whose first `white_rows` rows are pure white.
pub fn swatch_png(color: [u8; 3], white_rows: u32) -> Vec<u8> {
    encode_png(RgbImage::from_fn(100, 100, |_, y| {
        if y < white_rows {
            Rgb([255, 255, 255])
        } else {
            Rgb(color)
        }
    }))
}
