use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ToshokanError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Preferred quality text; an empty string disables the quality pass.
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub anilist: String,
    pub anizip: String,
    pub tosho: String,
}

impl FeedConfig {
    /// The quality preference, if one is set.
    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

impl AppConfig {
    /// Load config: the user file if it exists, otherwise the built-in defaults.
    pub fn load() -> Result<Self, ToshokanError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::defaults()
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ToshokanError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ToshokanError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ToshokanError::Config(e.to_string()))
    }

    fn defaults() -> Result<Self, ToshokanError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| ToshokanError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), ToshokanError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ToshokanError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ToshokanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "toshokan")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.feed.quality(), Some("1080"));
        assert!(config.feed.exclusions.iter().any(|e| e == "DTS"));
        assert_eq!(config.endpoints.anizip, "https://api.ani.zip");
    }

    #[test]
    fn test_blank_quality_is_none() {
        let feed = FeedConfig {
            quality: Some("  ".into()),
            exclusions: Vec::new(),
        };
        assert!(feed.quality().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.feed.quality = Some("720".into());
        config.feed.exclusions = vec!["HEVC".into()];
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.feed.quality(), Some("720"));
        assert_eq!(loaded.feed.exclusions, vec!["HEVC".to_string()]);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[feed\nquality = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ToshokanError::Config(_))
        ));
    }
}
