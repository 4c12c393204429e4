//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use skuline_dsg::config::{
    DEFAULT_CONCURRENCY, DEFAULT_COOKIE_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_BUDGET,
};
use skuline_dsg::Endpoints;

/// File-level configuration for skuline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub files: FilesConfig,
    pub fetch: FetchConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub output: PathBuf,
    pub cookies: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            cookies: PathBuf::from(DEFAULT_COOKIE_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub concurrency: usize,
    pub timeout_budget: usize,
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_budget: DEFAULT_TIMEOUT_BUDGET,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// API base URL overrides; unset fields keep the production endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EndpointsConfig {
    pub product_api: Option<String>,
    pub category_api: Option<String>,
    pub image_api: Option<String>,
}

impl EndpointsConfig {
    pub fn resolve(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        if let Some(url) = &self.product_api {
            endpoints.product_api = url.clone();
        }
        if let Some(url) = &self.category_api {
            endpoints.category_api = url.clone();
        }
        if let Some(url) = &self.image_api {
            endpoints.image_api = url.clone();
        }
        endpoints
    }
}

impl FileConfig {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./skuline.toml (current directory)
    /// 2. ~/.config/skuline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("skuline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "skuline") {
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

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
