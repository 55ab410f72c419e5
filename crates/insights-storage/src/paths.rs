//! Data and log directory paths
//!
//! Platform directories come from the `dirs` crate:
//! - Linux: `~/.local/share/insights-background/store/`, `~/.cache/insights-background/`
//! - macOS: `~/Library/Application Support/insights-background/store/`, `~/Library/Caches/insights-background/`
//! - Windows: `%APPDATA%\insights-background\store\`, `%LOCALAPPDATA%\insights-background\`
//!
//! Every directory is created on first lookup.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "insights-background";
const STORE_DIR: &str = "store";

/// Create `relative` under `base` and return the full path
fn ensure_dir(base: Option<PathBuf>, kind: &str, relative: &Path) -> Result<PathBuf> {
    let base = base.with_context(|| format!("Could not determine {} directory", kind))?;
    let dir = base.join(relative);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create {}", dir.display()))?;
    Ok(dir)
}

/// Log files
pub fn cache_dir() -> Result<PathBuf> {
    ensure_dir(dirs::cache_dir(), "cache", Path::new(APP_NAME))
}

/// Persisted store snapshots, one JSON file per key
pub fn data_dir() -> Result<PathBuf> {
    ensure_dir(dirs::data_dir(), "data", &Path::new(APP_NAME).join(STORE_DIR))
}
