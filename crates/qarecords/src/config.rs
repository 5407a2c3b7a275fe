//! Configuration management for qarecords.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "qarecords";

/// Default prefix for exported CSV file names.
const DEFAULT_EXPORT_PREFIX: &str = "kp_records";

/// Prefix of environment variable overrides.
const ENV_PREFIX: &str = "QARECORDS_";

/// Separates the section from the field in an environment variable name.
const ENV_SEPARATOR: &str = "__";

/// Characters allowed in names that end up in file names.
const SAFE_NAME_PATTERN: &str = r"^[A-Za-z0-9_.-]+$";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `QARECORDS_`, sections split on
///    `__`, e.g. `QARECORDS_ENTRY__CONFIRM_DUPLICATES=false`)
/// 2. TOML config file at `~/.config/qarecords/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Record entry configuration.
    pub entry: EntryConfig,
    /// CSV export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the record store.
    /// Defaults to `~/.local/share/qarecords`
    pub data_dir: Option<PathBuf>,
    /// Key the record collection is stored under.
    pub key: String,
}

/// Record entry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Ask before adding a question that already exists.
    pub confirm_duplicates: bool,
}

/// CSV export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Prefix of generated export file names.
    pub file_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            confirm_duplicates: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `QARECORDS_`, nested keys
    ///    separated by `__`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let safe = Regex::new(SAFE_NAME_PATTERN).map_err(|e| Error::ConfigValidation {
            message: format!("invalid name pattern: {e}"),
        })?;

        if !safe.is_match(&self.storage.key) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "storage key {:?} must be non-empty and use only letters, digits, '_', '.' or '-'",
                    self.storage.key
                ),
            });
        }

        if !safe.is_match(&self.export.file_prefix) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "export file_prefix {:?} must be non-empty and use only letters, digits, '_', '.' or '-'",
                    self.export.file_prefix
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the path of the file holding the record collection.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(format!("{}.json", self.storage.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.storage.key, "qaRecords");
        assert!(config.entry.confirm_duplicates);
        assert_eq!(config.export.file_prefix, "kp_records");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage key"));
    }

    #[test]
    fn test_validate_key_with_separator() {
        let mut config = Config::default();
        config.storage.key = "../escape".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_export_prefix() {
        let mut config = Config::default();
        config.export.file_prefix = "my records".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("file_prefix"));
    }

    #[test]
    fn test_store_path_default() {
        let config = Config::default();
        let path = config.store_path();

        assert!(path.to_string_lossy().contains("qarecords"));
        assert!(path.to_string_lossy().ends_with("qaRecords.json"));
    }

    #[test]
    fn test_store_path_custom() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/custom/data"));
        config.storage.key = "deck".to_string();

        assert_eq!(config.store_path(), PathBuf::from("/custom/data/deck.json"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("qarecords"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[default.entry]\nconfirm_duplicates = false\n\n[default.export]\nfile_prefix = \"deck\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert!(!config.entry.confirm_duplicates);
        assert_eq!(config.export.file_prefix, "deck");
    }

    #[test]
    fn test_load_rejects_invalid_toml_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[default.storage]\nkey = \"\"\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_load_env_overrides_nested_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("QARECORDS_ENTRY__CONFIRM_DUPLICATES", "false");
            jail.set_env("QARECORDS_EXPORT__FILE_PREFIX", "deck");
            jail.set_env("QARECORDS_STORAGE__DATA_DIR", "/srv/qa");

            let config =
                Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
            assert!(!config.entry.confirm_duplicates);
            assert_eq!(config.export.file_prefix, "deck");
            assert_eq!(config.data_dir(), PathBuf::from("/srv/qa"));
            assert_eq!(config.storage.key, "qaRecords");
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[default.export]\nfile_prefix = \"from_file\"\n",
            )?;
            jail.set_env("QARECORDS_EXPORT__FILE_PREFIX", "deck");

            let path = jail.directory().join("config.toml");
            let config = Config::load_from(Some(path)).unwrap();
            assert_eq!(config.export.file_prefix, "deck");
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("confirm_duplicates"));
        assert!(json.contains("file_prefix"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"key": "deck"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.key, "deck");
        assert!(storage.data_dir.is_none());
    }
}
