//! Runtime configuration.
//!
//! Resolution order: built-in defaults, then `qrtrack.toml` (if present), then
//! `QRTRACK_*` environment variables. CLI flags are applied last by the caller.

use crate::core::error::QrTrackError;
use crate::core::schemas;
use crate::core::store::Store;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "qrtrack.toml";
pub const ENV_DATA_DIR: &str = "QRTRACK_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "QRTRACK_LOG_LEVEL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_name: String,
    pub qr_dir: String,
    /// Pixel size of one QR module
    pub module_size: u32,
    /// Width of the inline image in HTML listings
    pub thumbnail_width: u32,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("temp_data"),
            db_name: schemas::PRODUKSI_DB_NAME.to_string(),
            qr_dir: schemas::QR_DIR_NAME.to_string(),
            module_size: 10,
            thumbnail_width: 100,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, QrTrackError> {
        let config: Config =
            toml::from_str(content).map_err(|e| QrTrackError::ConfigError(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Loads `path` if given (must exist), else `qrtrack.toml` in `cwd` if present.
    pub fn load<F>(path: Option<&Path>, cwd: &Path, env: F) -> Result<Self, QrTrackError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    QrTrackError::ConfigError(format!("cannot read {}: {}", p.display(), e))
                })?;
                Self::parse(&content)?
            }
            None => {
                let default_path = cwd.join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    let content = fs::read_to_string(&default_path)?;
                    Self::parse(&content)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(env);
        if config.data_dir.is_relative() {
            config.data_dir = cwd.join(&config.data_dir);
        }
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = env(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = env(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log.level = level;
        }
    }

    pub fn store(&self) -> Store {
        Store {
            root: self.data_dir.clone(),
            db_name: self.db_name.clone(),
            qr_dir_name: self.qr_dir.clone(),
        }
    }

    fn check(&self) -> Result<(), QrTrackError> {
        if self.module_size == 0 {
            return Err(QrTrackError::ConfigError(
                "module_size must be at least 1".to_string(),
            ));
        }
        if self.db_name.trim().is_empty() || self.qr_dir.trim().is_empty() {
            return Err(QrTrackError::ConfigError(
                "db_name and qr_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
