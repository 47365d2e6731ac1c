//! Configuration management for the entdb CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const DEFAULT_SCRATCH_DIR: &str = ".tmp";
pub const DEFAULT_CATALOG_URL: &str = "https://maddie480.ovh/celeste/custom-entity-catalog.json";
pub const DEFAULT_UPDATER_INDEX_URL: &str = "https://everestapi.github.io/modupdater.txt";
pub const DEFAULT_MIRROR_URL: &str = "https://celestemodupdater.0x0a.de/banana-mirror/{id}.zip";
pub const DEFAULT_FILE_LIST_URL: &str = "https://gamebanana.com/apiv11/File/{id}/RawFileList";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Directory holding the entity database, error log and census reports
    pub cache_dir: Option<PathBuf>,
    /// Directory holding the reused download archive
    pub scratch_dir: Option<PathBuf>,
    /// Probe hosted file lists before downloading
    pub probe: Option<bool>,
    pub catalog_url: Option<String>,
    pub updater_index_url: Option<String>,
    /// Archive download template, `{id}` is replaced by the file id
    pub mirror_url: Option<String>,
    /// Raw file list template, `{id}` is replaced by the file id
    pub file_list_url: Option<String>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("entdb");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR))
    }

    pub fn probe(&self) -> bool {
        self.probe.unwrap_or(true)
    }

    pub fn catalog_url(&self) -> &str {
        self.catalog_url.as_deref().unwrap_or(DEFAULT_CATALOG_URL)
    }

    pub fn updater_index_url(&self) -> &str {
        self.updater_index_url
            .as_deref()
            .unwrap_or(DEFAULT_UPDATER_INDEX_URL)
    }

    pub fn mirror_url(&self) -> &str {
        self.mirror_url.as_deref().unwrap_or(DEFAULT_MIRROR_URL)
    }

    pub fn file_list_url(&self) -> &str {
        self.file_list_url.as_deref().unwrap_or(DEFAULT_FILE_LIST_URL)
    }
}
