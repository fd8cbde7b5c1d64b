//! Configuration management for fastroid
//!
//! A configuration can be built in code, read from a YAML or JSON file, or
//! read from `FASTROID_*` environment variables. [`ConfigOverrides`] carries
//! only the settings a source actually specified, so layering sources never
//! resets a value to its default.
//!
//! [`ConfigLoader`](crate::config_loader::ConfigLoader) combines the sources.

use crate::{
    error::{FastroidError, Result},
    messages::MessageCatalog,
    schema::NamingStrategy,
    value::ValueBinding,
};
use fastroid_common::DEFAULT_DATABASE_FILENAME;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ENV_DATABASE_PATH: &str = "FASTROID_DATABASE_PATH";
pub const ENV_NAMING: &str = "FASTROID_NAMING";
pub const ENV_VALUE_BINDING: &str = "FASTROID_VALUE_BINDING";
pub const ENV_LOG_LEVEL: &str = "FASTROID_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "FASTROID_LOG_JSON";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete fastroid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastroidConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// How type and field names become table and column names
    pub naming: NamingStrategy,
    /// How staged values are bound to statements
    pub value_binding: ValueBinding,
    pub logging: LoggingConfig,
    /// Validation message templates
    pub messages: MessageCatalog,
}

impl Default for FastroidConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILENAME),
            naming: NamingStrategy::default(),
            value_binding: ValueBinding::default(),
            logging: LoggingConfig::default(),
            messages: MessageCatalog::default(),
        }
    }
}

/// Settings specified by one configuration source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub naming: Option<NamingStrategy>,
    pub value_binding: Option<ValueBinding>,
    pub logging: Option<LoggingOverrides>,
    /// Templates added to or replacing those already configured
    pub messages: Option<HashMap<String, String>>,
}

/// Logging settings specified by one configuration source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingOverrides {
    pub level: Option<String>,
    pub json: Option<bool>,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ConfigOverrides {
    /// Read overrides from `FASTROID_*` environment variables
    ///
    /// # Errors
    /// Returns `FastroidError::Configuration` if a variable holds an invalid value
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, which maps a variable name to its value
    ///
    /// # Errors
    /// Returns `FastroidError::Configuration` if a variable holds an invalid value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            overrides.database_path = Some(PathBuf::from(path));
        }
        if let Some(naming) = lookup(ENV_NAMING) {
            overrides.naming = Some(naming.parse()?);
        }
        if let Some(binding) = lookup(ENV_VALUE_BINDING) {
            overrides.value_binding = Some(binding.parse()?);
        }

        let mut logging = LoggingOverrides::default();
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            logging.level = Some(level.to_lowercase());
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            logging.json = Some(parse_bool(&json).ok_or_else(|| {
                FastroidError::configuration(format!("Invalid {ENV_LOG_JSON} value: {json}"))
            })?);
        }
        if logging != LoggingOverrides::default() {
            overrides.logging = Some(logging);
        }

        Ok(overrides)
    }

    /// Read overrides from a YAML (`.yaml`/`.yml`) or JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FastroidError::Io(std::io::Error::other(format!(
                "Failed to read config file {}: {e}",
                path.display()
            )))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml" | "yml")
        );
        if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                FastroidError::configuration(format!("Failed to parse YAML config: {e}"))
            })
        } else {
            serde_json::from_str(&content).map_err(|e| {
                FastroidError::configuration(format!("Failed to parse JSON config: {e}"))
            })
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl FastroidConfig {
    /// Create a configuration for the database at `path` with default settings
    #[must_use]
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `FASTROID_*` environment variables
    ///
    /// # Errors
    /// Returns `FastroidError::Configuration` if a variable holds an invalid value
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.merge_with(&ConfigOverrides::from_env()?);
        Ok(config)
    }

    /// Defaults overridden by a YAML or JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::default();
        config.merge_with(&ConfigOverrides::from_file(path)?);
        Ok(config)
    }

    /// Save the complete configuration as "yaml" or "json"
    ///
    /// # Errors
    /// Returns an error for an unknown format or if the file cannot be written
    pub fn to_file<P: AsRef<Path>>(&self, path: P, format: &str) -> Result<()> {
        let path = path.as_ref();
        let content = match format {
            "yaml" | "yml" => serde_yaml::to_string(self).map_err(|e| {
                FastroidError::configuration(format!("Failed to serialize YAML: {e}"))
            })?,
            "json" => serde_json::to_string_pretty(self)?,
            _ => {
                return Err(FastroidError::configuration(format!(
                    "Unsupported format: {format}"
                )))
            }
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply the settings a source specified
    pub fn merge_with(&mut self, other: &ConfigOverrides) {
        if let Some(path) = &other.database_path {
            self.database_path.clone_from(path);
        }
        if let Some(naming) = other.naming {
            self.naming = naming;
        }
        if let Some(binding) = other.value_binding {
            self.value_binding = binding;
        }
        if let Some(logging) = &other.logging {
            if let Some(level) = &logging.level {
                self.logging.level.clone_from(level);
            }
            if let Some(json) = logging.json {
                self.logging.json = json;
            }
        }
        if let Some(messages) = &other.messages {
            for (key, template) in messages {
                self.messages = std::mem::take(&mut self.messages).with_message(key, template);
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `FastroidError::Configuration` if the configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(FastroidError::configuration("Database path cannot be empty"));
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(FastroidError::configuration(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        for (key, template) in self.messages.entries() {
            if template.trim().is_empty() {
                return Err(FastroidError::configuration(format!(
                    "Message template {key} cannot be empty"
                )));
            }
        }

        Ok(())
    }
}
