//! Configuration and storage for the insights background process
//!
//! This crate provides:
//! - Directory paths for data and log files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Key-value backends for persistent stores (file and in-memory)

pub mod app_config;
pub mod config_file;
pub mod file_store;
pub mod memory_store;
pub mod paths;

pub use app_config::{AppConfig, ConfigOrigin};
pub use config_file::{find_config_file, load_config_file, ConfigSource};
pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use paths::{cache_dir, data_dir};
