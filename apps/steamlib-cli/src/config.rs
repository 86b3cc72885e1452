//! CLI configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/steamlib/config.toml`
//! - Windows: `%APPDATA%/steamlib/config.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use steamlib_steam::store::DEFAULT_MAX_BACKUPS;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Steam installation directory (the one containing `userdata`).
    #[serde(default = "default_steam_dir")]
    pub steam_dir: PathBuf,

    /// Account whose shortcuts are managed. When unset, the first account
    /// with a shortcuts file is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Backups of shortcuts.vdf kept after each write.
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

fn default_steam_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        PathBuf::from("C:\\Program Files (x86)\\Steam")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".steam").join("steam")
    }
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_BACKUPS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_dir: default_steam_dir(),
            account_id: None,
            max_backups: default_max_backups(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or creates a default if not found.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("steamlib").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("steamlib")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.account_id.is_none());
        assert_eq!(config.max_backups, 5);
        assert!(config.steam_dir.ends_with("steam") || config.steam_dir.ends_with("Steam"));
    }

    #[test]
    fn config_partial_toml() {
        let config: Config = toml::from_str(r#"account_id = "43925226""#).unwrap();
        assert_eq!(config.account_id.as_deref(), Some("43925226"));
        assert_eq!(config.max_backups, 5);
        assert_eq!(config.steam_dir, default_steam_dir());
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("steamlib").join("config.toml");

        let config = Config {
            steam_dir: "/srv/steam".into(),
            account_id: Some("7".into()),
            max_backups: 2,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_config_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn config_path_not_empty() {
        assert!(config_path().to_string_lossy().contains("steamlib"));
    }
}
