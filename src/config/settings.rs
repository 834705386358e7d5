//! Optional settings file
//!
//! Read from `--config <path>` or `$CONFIG_HOME/iolat/iolat.toml`.
//! Command line flags take precedence over anything set here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{IoLatError, Result, APP_NAME, CONFIG_FILE};

/// Persistent user preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Fixed seed for the offset generator
    pub seed: Option<u64>,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: Option<String>,
    pub results: ResultsSettings,
}

/// Result history preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResultsSettings {
    /// Append every probe result to the history
    pub record: bool,
    /// History file location
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `explicit` if given, else from the standard
    /// location. A missing standard file yields defaults; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let Ok(config_path) = Self::config_file_path() else {
            return Ok(Self::default());
        };
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IoLatError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let settings: Self = toml::from_str(&content).map_err(|e| {
            IoLatError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Standard configuration file path
    /// Uses $CONFIG_HOME/iolat/iolat.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            IoLatError::Config("Unable to determine config directory".to_string())
        })?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_full_settings() {
        let settings = Settings::from_toml(
            r#"
            seed = 1234
            log_level = "debug"

            [results]
            record = true
            path = "/var/lib/iolat/history.json"
            "#,
        )
        .unwrap();
        assert_eq!(settings.seed, Some(1234));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert!(settings.results.record);
        assert_eq!(
            settings.results.path,
            Some(PathBuf::from("/var/lib/iolat/history.json"))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Settings::from_toml("block_size = 8192").unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_explicit_file_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("iolat.toml");
        fs::write(&path, "seed = 99\n").unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap().seed, Some(99));
    }

    #[test]
    fn test_config_file_path() {
        if let Ok(path) = Settings::config_file_path() {
            assert!(path.ends_with("iolat/iolat.toml"));
        }
    }
}
