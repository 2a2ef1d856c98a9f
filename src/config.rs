//! Configuration module for listr
//!
//! Manages named item stores and per-listing search settings.
//! Configuration is stored in the user's config directory.
//!
//! ```toml
//! default_database = "main"
//!
//! [databases]
//! main = "/home/me/.local/share/listr/main"
//!
//! [papers]
//! page_size = 12
//! score_threshold = 0.5
//!
//! [posts]
//! field_threshold = 0.3
//! base_path = "/forum"
//! ```

use crate::item::ListingKind;
use crate::pipeline::ListingProfile;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Overrides for one listing kind; unset values keep the built-in profile
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ListingSettings {
    /// Items per page
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Items must score strictly below this to be listed
    #[serde(default)]
    pub score_threshold: Option<f64>,

    /// Per-field acceptance threshold applied to every field
    #[serde(default)]
    pub field_threshold: Option<f64>,

    /// Path redirect locations are built on
    #[serde(default)]
    pub base_path: Option<String>,
}

impl ListingSettings {
    /// Apply these overrides on top of `profile`
    ///
    /// Out-of-range values are ignored with a warning.
    #[must_use]
    pub fn apply(&self, mut profile: ListingProfile) -> ListingProfile {
        match self.page_size {
            Some(0) => warn!(kind = %profile.kind, "ignoring page_size = 0"),
            Some(size) => profile.page_size = size,
            None => {}
        }

        match self.score_threshold {
            Some(t) if t.is_finite() && t > 0.0 => profile.score_threshold = t,
            Some(t) => warn!(
                kind = %profile.kind,
                value = t,
                "ignoring non-positive score_threshold"
            ),
            None => {}
        }

        match self.field_threshold {
            Some(t) if (0.0..=1.0).contains(&t) => profile = profile.with_field_threshold(t),
            Some(t) => warn!(
                kind = %profile.kind,
                value = t,
                "ignoring field_threshold outside 0..=1"
            ),
            None => {}
        }

        if let Some(base) = &self.base_path {
            profile.base_path.clone_from(base);
        }

        profile
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ListrConfig {
    /// Map of database names to their filesystem paths
    #[serde(default)]
    pub databases: HashMap<String, PathBuf>,

    /// The default database to use when none is specified
    #[serde(default)]
    pub default_database: Option<String>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Overrides for the paper listing
    #[serde(default)]
    pub papers: ListingSettings,

    /// Overrides for the post listing
    #[serde(default)]
    pub posts: ListingSettings,
}

impl ListrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("listr").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Register a named database
    pub fn add_database(&mut self, name: String, path: PathBuf) {
        if self.default_database.is_none() {
            self.default_database = Some(name.clone());
        }
        self.databases.insert(name, path);
    }

    /// Forget a named database, clearing the default if it pointed there
    pub fn remove_database(&mut self, name: &str) -> Option<PathBuf> {
        if self.default_database.as_deref() == Some(name) {
            self.default_database = None;
        }
        self.databases.remove(name)
    }

    /// Get a database path by name
    #[must_use]
    pub fn get_database(&self, name: &str) -> Option<&PathBuf> {
        self.databases.get(name)
    }

    /// List all database names, sorted
    #[must_use]
    pub fn list_databases(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.databases.keys().collect();
        names.sort();
        names
    }

    /// Set the default database
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database name doesn't exist in the configuration.
    pub fn set_default_database(&mut self, name: String) -> Result<(), ConfigError> {
        if !self.databases.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Database '{name}' does not exist in configuration"
            )));
        }
        self.default_database = Some(name);
        Ok(())
    }

    /// Get the default database name
    #[must_use]
    pub const fn get_default_database(&self) -> Option<&String> {
        self.default_database.as_ref()
    }

    /// Resolve the store to open
    ///
    /// An explicit name must be configured. Without one the default database
    /// is used, falling back to `<data dir>/listr/default` when nothing is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the named (or default) database is not
    /// configured, or the data directory cannot be determined.
    pub fn resolve_database(&self, name: Option<&str>) -> Result<PathBuf, ConfigError> {
        if let Some(name) = name.or(self.default_database.as_deref()) {
            return self
                .get_database(name)
                .cloned()
                .ok_or_else(|| {
                    ConfigError::Message(format!("Database '{name}' not found in configuration"))
                });
        }

        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?;
        Ok(data_dir.join("listr").join("default"))
    }

    /// Overrides for `kind`
    #[must_use]
    pub const fn settings(&self, kind: ListingKind) -> &ListingSettings {
        match kind {
            ListingKind::Papers => &self.papers,
            ListingKind::Posts => &self.posts,
        }
    }

    /// Built-in profile for `kind` with this configuration's overrides applied
    #[must_use]
    pub fn profile(&self, kind: ListingKind) -> ListingProfile {
        self.settings(kind).apply(ListingProfile::for_kind(kind))
    }

    /// Set a configuration value from a `key=value` string
    ///
    /// Supported keys: `quiet`, and `<papers|posts>.<field>` where field is one
    /// of `page_size`, `score_threshold`, `field_threshold` or `base_path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown keys or unparsable values.
    pub fn set_value(&mut self, setting: &str) -> Result<(), ConfigError> {
        let (key, value) = setting
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or_else(|| ConfigError::Message(format!("Expected KEY=VALUE, got '{setting}'")))?;

        if key == "quiet" {
            self.quiet = parse_value(key, value)?;
            return Ok(());
        }

        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| ConfigError::Message(format!("Unknown configuration key '{key}'")))?;
        let settings = match section {
            "papers" => &mut self.papers,
            "posts" => &mut self.posts,
            _ => return Err(ConfigError::Message(format!("Unknown configuration key '{key}'"))),
        };

        match field {
            "page_size" => settings.page_size = Some(parse_value(key, value)?),
            "score_threshold" => settings.score_threshold = Some(parse_value(key, value)?),
            "field_threshold" => settings.field_threshold = Some(parse_value(key, value)?),
            "base_path" => settings.base_path = Some(value.to_string()),
            _ => return Err(ConfigError::Message(format!("Unknown configuration key '{key}'"))),
        }
        Ok(())
    }

    /// Get a configuration value as a display string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown keys.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        if key == "quiet" {
            return Ok(self.quiet.to_string());
        }

        let kind = match key.split_once('.') {
            Some(("papers", _)) => ListingKind::Papers,
            Some(("posts", _)) => ListingKind::Posts,
            _ => return Err(ConfigError::Message(format!("Unknown configuration key '{key}'"))),
        };
        let profile = self.profile(kind);

        match key.split_once('.').map(|(_, field)| field) {
            Some("page_size") => Ok(profile.page_size.to_string()),
            Some("score_threshold") => Ok(profile.score_threshold.to_string()),
            Some("field_threshold") => Ok(self
                .settings(kind)
                .field_threshold
                .map_or_else(|| "per-field defaults".to_string(), |t| t.to_string())),
            Some("base_path") => Ok(profile.base_path),
            _ => Err(ConfigError::Message(format!("Unknown configuration key '{key}'"))),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::Message(format!("Invalid value '{value}' for {key}: {e}")))
}
