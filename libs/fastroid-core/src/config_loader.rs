//! Configuration loader
//!
//! Layers configuration sources with increasing precedence: a base
//! configuration (defaults unless replaced), then each file in order, then
//! `FASTROID_*` environment variables.

use crate::config::{ConfigOverrides, FastroidConfig};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration loader that handles multiple sources with precedence
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_config: FastroidConfig,
    config_paths: Vec<PathBuf>,
    load_from_env: bool,
    validate: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader over the default file locations and the environment
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_config: FastroidConfig::default(),
            config_paths: Self::get_default_config_paths(),
            load_from_env: true,
            validate: true,
        }
    }

    #[must_use]
    pub fn with_base_config(mut self, config: FastroidConfig) -> Self {
        self.base_config = config;
        self
    }

    /// Add a configuration file path after the existing ones
    #[must_use]
    pub fn add_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replace the configuration file paths
    #[must_use]
    pub fn with_config_paths<P: AsRef<Path>>(mut self, paths: Vec<P>) -> Self {
        self.config_paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    #[must_use]
    pub fn with_env_loading(mut self, enabled: bool) -> Self {
        self.load_from_env = enabled;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Load configuration from all sources
    ///
    /// Missing files are skipped. A file that exists but cannot be parsed is
    /// an error.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read or parsed, or if the final
    /// configuration is invalid
    pub fn load(&self) -> Result<FastroidConfig> {
        let mut config = self.base_config.clone();
        info!("Starting configuration loading process");

        for path in &self.config_paths {
            if !path.exists() {
                debug!("Configuration file not found: {}", path.display());
                continue;
            }
            debug!("Loading configuration from file: {}", path.display());
            config.merge_with(&ConfigOverrides::from_file(path)?);
            info!("Loaded configuration from: {}", path.display());
        }

        if self.load_from_env {
            debug!("Loading configuration from environment variables");
            let overrides = ConfigOverrides::from_env()?;
            if !overrides.is_empty() {
                config.merge_with(&overrides);
                info!("Applied configuration from environment variables");
            }
        }

        if self.validate {
            debug!("Validating final configuration");
            config.validate()?;
        }

        info!("Configuration loading completed");
        Ok(config)
    }

    /// Default configuration file locations, lowest precedence first
    #[must_use]
    pub fn get_default_config_paths() -> Vec<PathBuf> {
        let user_dir = Self::get_user_config_dir();
        vec![
            user_dir.join("fastroid.json"),
            user_dir.join("fastroid.yaml"),
            user_dir.join("fastroid.yml"),
            PathBuf::from("fastroid.json"),
            PathBuf::from("fastroid.yaml"),
            PathBuf::from("fastroid.yml"),
        ]
    }

    /// User configuration directory
    #[must_use]
    pub fn get_user_config_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config").join("fastroid")
        } else if let Ok(userprofile) = std::env::var("USERPROFILE") {
            PathBuf::from(userprofile)
                .join("AppData")
                .join("Roaming")
                .join("fastroid")
        } else {
            PathBuf::from("~/.config/fastroid")
        }
    }
}

/// Load configuration from the default files and the environment
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config() -> Result<FastroidConfig> {
    ConfigLoader::new().load()
}

/// Load configuration from the given files and the environment
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config_with_paths<P: AsRef<Path>>(config_paths: Vec<P>) -> Result<FastroidConfig> {
    ConfigLoader::new().with_config_paths(config_paths).load()
}

/// Load configuration from environment variables only
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config_from_env() -> Result<FastroidConfig> {
    ConfigLoader::new()
        .with_config_paths::<PathBuf>(vec![])
        .load()
}
