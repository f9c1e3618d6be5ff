//! User configuration: load / save and path helpers.
//!
//! Configuration lives in `~/.config/tabshift/config.yaml`. Every field has a
//! default so a partial (or empty) file is valid.

use crate::error::ConfigError;
use crate::types::{LogLevel, SpecialTabAction, default_special_tabs};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the workflow collection is persisted.
pub const WORKFLOWS_KEY: &str = "workflows";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<key>.yaml` persistence files.
    /// `None` means the config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Close every editor tab once a workflow has been saved
    pub close_tabs_after_save: bool,

    /// Ask the host to save dirty documents before capturing
    pub save_documents_before_capture: bool,

    /// Prefix of the suggested name when saving (`"<prefix> YYYY-MM-DD HH_MM_SS"`)
    pub default_name_prefix: String,

    /// Label to action table for restoring tabs without a uri
    pub special_tabs: Vec<SpecialTabAction>,

    /// Debug log level (overridden by `--log-level` and `RUST_LOG`)
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            close_tabs_after_save: true,
            save_documents_before_capture: true,
            default_name_prefix: "Workflow".to_string(),
            special_tabs: default_special_tabs(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    ///
    /// A missing file is created with defaults; an empty file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Config path: {:?}", path);

        if !path.exists() {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write config to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move config into place at {:?}", path))?;

        Ok(())
    }

    /// Reject values the rest of the program cannot work with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Some(entry) = self
            .special_tabs
            .iter()
            .find(|e| e.label.is_empty() || e.action.is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "special_tabs entry {:?} needs both a label and an action",
                entry
            )));
        }
        Ok(())
    }

    /// Directory the persistence backend writes to.
    pub fn effective_storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(Self::config_dir)
    }

    /// `~/.config/tabshift` (XDG layout on every platform except Windows)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("tabshift")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("tabshift")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// `~/.config/tabshift/config.yaml`
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.close_tabs_after_save);
        assert!(config.save_documents_before_capture);
        assert_eq!(config.default_name_prefix, "Workflow");
        assert_eq!(config.special_tabs, default_special_tabs());
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_empty_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "close_tabs_after_save: false\nlog_level: debug\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.close_tabs_after_save);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.save_documents_before_capture);
        assert_eq!(config.special_tabs.len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "not: valid: yaml: [[[").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_special_tab_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "special_tabs:\n  - label: Settings\n    action: \"\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip_leaves_no_temp_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");

        let config = Config {
            storage_dir: Some(temp.path().join("store")),
            default_name_prefix: "Layout".to_string(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert!(!path.with_extension("yaml.tmp").exists());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.effective_storage_dir(), temp.path().join("store"));
    }
}
