//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use pressline_pagesuite::{Endpoints, PublicationConfig};
use serde::Deserialize;

/// Global configuration: output location, endpoint overrides, and the
/// publication roster.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub endpoints: Endpoints,
    pub papers: Vec<PublicationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./pressline.toml (current directory)
    /// 2. ~/.config/pressline/config.toml
    ///
    /// If no config file found, returns default config (empty roster).
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("pressline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "pressline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // API keys may reference environment variables.
        for paper in &mut config.papers {
            if let Some(key) = paper.api_key.take() {
                paper.api_key = expand_env_var(&key);
            }
        }

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Look up one publication by slug.
    pub fn paper(&self, slug: &str) -> Result<&PublicationConfig> {
        self.papers.iter().find(|p| p.slug == slug).with_context(|| {
            let available: Vec<&str> = self.papers.iter().map(|p| p.slug.as_str()).collect();
            format!("Unknown paper '{slug}'. Available: {}", available.join(", "))
        })
    }
}
