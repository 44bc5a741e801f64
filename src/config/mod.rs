// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for photosift
//!
//! Values are layered: built-in defaults, then the JSON config file, then the
//! `INPUT_DIR` / `OUTPUT_DIR` / `PORT` environment variables, then CLI flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{PhotosiftError, Result};

/// Environment variable naming the directory to triage
pub const ENV_INPUT_DIR: &str = "INPUT_DIR";
/// Environment variable naming the directory sorted files are moved into
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// Environment variable overriding the review server port
pub const ENV_PORT: &str = "PORT";

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Directory holding the files still to be sorted
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving one subfolder per category
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Review server settings
    #[serde(default)]
    pub web: WebConfig,

    /// Image conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversionConfig {
    /// MIME types re-encoded to PNG by the `convert` pass
    #[serde(default = "default_conversion_mime_types")]
    pub mime_types: Vec<String>,
}

fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8000 }

fn default_conversion_mime_types() -> Vec<String> {
    vec!["image/tiff".to_string(), "image/bmp".to_string()]
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mime_types: default_conversion_mime_types(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| PhotosiftError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = lookup(ENV_INPUT_DIR) {
            self.input_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.web.port = port.trim().parse().map_err(|_| {
                PhotosiftError::Config(format!("{} is not a valid port: {:?}", ENV_PORT, port))
            })?;
        }
        Ok(())
    }

    /// Resolve the input and output roots, failing when either is missing
    pub fn directories(&self) -> Result<(PathBuf, PathBuf)> {
        let input = self.input_dir.clone().ok_or_else(|| {
            PhotosiftError::Config(format!("input directory not set (config or {})", ENV_INPUT_DIR))
        })?;
        let output = self.output_dir.clone().ok_or_else(|| {
            PhotosiftError::Config(format!("output directory not set (config or {})", ENV_OUTPUT_DIR))
        })?;
        Ok((input, output))
    }
}
