//! File-based logging using simplelog
//!
//! Log files land in the cache directory (~/.cache/insights-background/ on
//! Linux), falling back to the current directory. Stdout carries store state,
//! so nothing is logged to the terminal.

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

fn log_file_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("insights-background-{}.log", timestamp);

    insights_storage::cache_dir()
        .map(|dir| dir.join(&filename))
        .unwrap_or_else(|_| PathBuf::from(filename))
}

/// Parse a level name, `None` for anything unknown
fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// `RUST_LOG` wins over the configured level; unknown names mean info
fn resolve_level(env_level: Option<&str>, configured: &str) -> LevelFilter {
    env_level
        .and_then(parse_level)
        .or_else(|| parse_level(configured))
        .unwrap_or(LevelFilter::Info)
}

/// Initialize file-based logging
///
/// Returns the path of the log file.
pub fn init(configured_level: &str) -> Result<PathBuf> {
    let log_file = log_file_path();
    let env_level = std::env::var("RUST_LOG").ok();
    let level = resolve_level(env_level.as_deref(), configured_level);

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c)
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;

    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_level_wins() {
        assert_eq!(resolve_level(Some("warn"), "trace"), LevelFilter::Warn);
        assert_eq!(resolve_level(Some("TRACE"), "error"), LevelFilter::Trace);
    }

    #[test]
    fn test_configured_level_used_without_env() {
        assert_eq!(resolve_level(None, "error"), LevelFilter::Error);
        assert_eq!(resolve_level(Some("loud"), "debug"), LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_levels_fall_back_to_info() {
        assert_eq!(resolve_level(None, "verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_log_file_name() {
        let path = log_file_path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("insights-background-"));
        assert!(name.ends_with(".log"));
    }
}
