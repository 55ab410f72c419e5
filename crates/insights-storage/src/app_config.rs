//! Application configuration
//!
//! Configuration loaded from .insights-background.toml.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config_file::ConfigSource;

/// Application configuration loaded from .insights-background.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory for persisted store snapshots (default: platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Write store snapshots after every change
    #[serde(default = "default_true")]
    pub persist_store_data: bool,

    /// Start from empty state instead of restoring snapshots
    #[serde(default)]
    pub ignore_persisted_data: bool,

    /// Keep snapshots in memory only (nothing survives a restart)
    #[serde(default)]
    pub in_memory: bool,

    /// Log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            persist_store_data: default_true(),
            ignore_persisted_data: false,
            in_memory: false,
            log_level: default_log_level(),
        }
    }
}

/// Where the loaded configuration came from
///
/// Config is read before logging is set up, so the outcome is handed back for
/// the caller to log once it can.
#[derive(Debug)]
pub enum ConfigOrigin {
    Defaults,
    File(PathBuf),
    Invalid {
        path: PathBuf,
        error: toml::de::Error,
    },
}

impl ConfigOrigin {
    pub fn log(&self) {
        match self {
            ConfigOrigin::Defaults => log::debug!("No config file found, using defaults"),
            ConfigOrigin::File(path) => log::info!("Loaded app config from {}", path.display()),
            ConfigOrigin::Invalid { path, error } => {
                log::warn!("Failed to parse {}, using defaults: {}", path.display(), error)
            }
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> (Self, ConfigOrigin) {
        match crate::load_config_file() {
            Some(source) => Self::from_source(&source),
            None => (Self::default(), ConfigOrigin::Defaults),
        }
    }

    /// Parse `source`, falling back to defaults when it is not valid TOML
    pub fn from_source(source: &ConfigSource) -> (Self, ConfigOrigin) {
        match toml::from_str(&source.content) {
            Ok(config) => (config, ConfigOrigin::File(source.path.clone())),
            Err(error) => (
                Self::default(),
                ConfigOrigin::Invalid {
                    path: source.path.clone(),
                    error,
                },
            ),
        }
    }

    /// Directory for snapshots, falling back to the platform data dir
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Ok(dir.clone())
            }
            None => crate::paths::data_dir(),
        }
    }
}
