//! Locating `.insights-background.toml`
//!
//! The working directory is searched before the home directory; the first
//! readable file wins.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".insights-background.toml";

/// A config file that was found and read
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Directories searched for the config file, in priority order
pub fn config_search_dirs() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".")];
    candidates.extend(dirs::home_dir());
    candidates
}

/// Read the first `CONFIG_FILE` found in `search_dirs`
pub fn find_config_file(search_dirs: &[PathBuf]) -> Option<ConfigSource> {
    search_dirs.iter().find_map(|dir| read_candidate(dir))
}

fn read_candidate(dir: &Path) -> Option<ConfigSource> {
    let path = dir.join(CONFIG_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(ConfigSource { path, content })
        }
        Err(e) => {
            log::trace!("No config at {}: {}", path.display(), e);
            None
        }
    }
}

/// Load the config file from the working directory or the home directory
pub fn load_config_file() -> Option<ConfigSource> {
    find_config_file(&config_search_dirs())
}
