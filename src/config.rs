//! Front-end configuration file.
//!
//! A TOML file with two tables:
//!
//! ```toml
//! [search]            # pack_search::SearchConfig
//! timeout_seconds = 8
//!
//! [defaults]          # per-query defaults for the CLI
//! page_size = 25
//! deep = true
//! pair_search = false
//! ```
//!
//! Every field is optional; missing ones take their defaults.

use std::path::{Path, PathBuf};

use pack_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{PackfinderError, Result};

/// Query defaults applied when the command line leaves them unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Records per page.
    pub page_size: usize,
    /// Use the cached multi-page deep search.
    pub deep: bool,
    /// Look up missing cross-provider links.
    pub pair_search: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            page_size: 25,
            deep: true,
            pair_search: false,
        }
    }
}

/// Top-level configuration for the packfinder front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackfinderConfig {
    /// Engine configuration.
    pub search: SearchConfig,
    /// Query defaults.
    pub defaults: SearchDefaults,
}

impl PackfinderConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds an invalid search configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| PackfinderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading config");
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PackfinderError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the engine configuration and the query defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PackfinderError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| PackfinderError::Config(e.to_string()))?;
        if self.defaults.page_size == 0 {
            return Err(PackfinderError::Config(
                "defaults.page_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path: `~/.config/packfinder/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("packfinder").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("packfinder")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/packfinder-config/config.toml")
        }
    }
}
