use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, CcError};
use crate::metadata::DEFAULT_SEPARATOR;

/// Environment variable that overrides `translate.api_key`
pub const API_KEY_ENV: &str = "CCTRANS_API_KEY";

fn default_timeout_secs() -> u64 {
    60
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

fn default_skip_source_language() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translate: TranslateConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Base URL of the DeepL-compatible translation API
    pub endpoint: String,
    /// API key sent as `DeepL-Auth-Key`
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout; a timed-out request fails only its own language
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranslateConfig {
    /// The configured key, unless the environment provides one.
    pub fn resolved_api_key(&self) -> String {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Which catalog implementation to use
    pub backend: CatalogBackend,
    /// Base URL of the catalog REST API (http backend)
    pub endpoint: String,
    /// Root directory of the on-disk catalog (directory backend)
    pub root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// Catalog REST API
    Http,
    /// Local directory tree, one folder per video
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reserved character splitting title/description into translation units
    #[serde(default = "default_separator")]
    pub metadata_separator: char,
    /// Drop target languages equal to the source language
    #[serde(default = "default_skip_source_language")]
    pub skip_source_language: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metadata_separator: default_separator(),
            skip_source_language: default_skip_source_language(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate: TranslateConfig {
                endpoint: "https://api-free.deepl.com/v2".to_string(),
                api_key: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            catalog: CatalogConfig {
                backend: CatalogBackend::Directory,
                endpoint: "http://localhost:8080".to_string(),
                root: PathBuf::from(".cctrans/catalog"),
            },
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CcError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CcError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CcError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CcError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
