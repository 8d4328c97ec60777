//! Application configuration
//!
//! Read from a JSON file. Every field has a default, so a missing file or a
//! partial one is fine. `DECKBOARD_DB` and `DECKBOARD_LOG_DIR` override the
//! two paths.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DB_ENV: &str = "DECKBOARD_DB";
pub const LOG_DIR_ENV: &str = "DECKBOARD_LOG_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Bucket names used by the media store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    pub deck_banner: String,
    pub deck_avatar: String,
    pub profile_photo: String,
    pub wallpaper: String,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            deck_banner: "deckbanner".to_string(),
            deck_avatar: "deckpfp".to_string(),
            profile_photo: "fotosdeperfil".to_string(),
            wallpaper: "fondosdepantalla".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub app_name: String,
    pub media_root: PathBuf,
    pub public_base_url: String,
    pub buckets: BucketConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("deckboard.db"),
            log_dir: PathBuf::from("logs"),
            app_name: "deckboard".to_string(),
            media_root: PathBuf::from("media"),
            public_base_url: "http://localhost:8080".to_string(),
            buckets: BucketConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `path`, falling back to defaults when it does not exist, then
    /// apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(db) = lookup(DB_ENV).filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|v| !v.is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }
    }
}
