//! Configuration management for lumabatch.
//!
//! Configuration is loaded from a TOML file in the platform config directory.
//! Every section has defaults, so a missing file or a partial one is fine.
//! The library itself never reads configuration; callers turn it into
//! explicit options.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Processing settings
    pub processing: ProcessingConfig,

    /// Custom luminance transform parameters
    pub luma: LumaConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path (`~` is expanded).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let path = expand_path(path);
        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.lumabatch.lumabatch/config.toml
    /// - Linux: ~/.config/lumabatch/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\lumabatch\config\config.toml
    ///
    /// Falls back to ~/.lumabatch/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "lumabatch", "lumabatch")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| expand_path(Path::new("~/.lumabatch/config.toml")))
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.processing.parallel_workers, 0);
        assert_eq!(config.luma.threshold, 200);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("[luma]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[luma]\nthreshold = 180\ncoef_r = 1.0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.luma.threshold, 180);
        assert_eq!(config.luma.coef_r, 1.0);
        assert_eq!(config.luma.coef_g, 0.587);
        assert_eq!(config.processing.parallel_workers, 0);
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.processing.parallel_workers = 6;
        config.luma.threshold = 50;
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.processing.parallel_workers, 6);
        assert_eq!(loaded.luma.parameters(), config.luma.parameters());
    }

    #[test]
    fn test_load_rejects_out_of_range_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[luma]\nthreshold = 300\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_expand_path_leaves_absolute_paths() {
        assert_eq!(
            expand_path(Path::new("/etc/lumabatch.toml")),
            PathBuf::from("/etc/lumabatch.toml")
        );
    }
}
