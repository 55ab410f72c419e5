use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use insights_background::notification::LogNotificationCreator;
use insights_background::{load_all_persisted_data, logger, ActionMessage, Dispatcher, StoreChange};
use insights_flux::KeyValueStore;
use insights_storage::{AppConfig, FileKeyValueStore, MemoryKeyValueStore};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, origin) = AppConfig::load();
    let log_file = logger::init(&config.log_level)?;

    log::info!("Starting insights-background");
    origin.log();
    log::debug!("Logging to {}", log_file.display());
    log::debug!("Config: {:?}", config);

    // Kept apart from the trait object so pending writes can be drained on exit
    let files = if config.in_memory {
        None
    } else {
        let dir = config.resolved_data_dir()?;
        log::info!("Persisting store data to {}", dir.display());
        Some(FileKeyValueStore::new(dir))
    };
    let backend: Arc<dyn KeyValueStore> = match &files {
        Some(files) => Arc::new(files.clone()),
        None => Arc::new(MemoryKeyValueStore::new()),
    };

    let persisted = load_all_persisted_data(backend.as_ref(), config.ignore_persisted_data).await;
    let mut dispatcher = Dispatcher::new(
        backend,
        persisted,
        config.persist_store_data,
        Rc::new(LogNotificationCreator),
    )?;

    print_changes(&dispatcher.snapshot()?)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: ActionMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Invalid message {:?}: {}", line, e);
                eprintln!("invalid message: {}", e);
                continue;
            }
        };

        match dispatcher.apply(message) {
            Ok(changes) => print_changes(&changes)?,
            Err(e) => {
                log::error!("{:#}", e);
                eprintln!("error: {:#}", e);
            }
        }
    }

    if let Some(files) = &files {
        log::debug!("Waiting for {} pending write(s)", files.pending_writes());
        files.wait_idle().await;
    }

    log::info!("Exiting insights-background");
    Ok(())
}

/// One JSON line per changed store
fn print_changes(changes: &[StoreChange]) -> Result<()> {
    for change in changes {
        let line = serde_json::to_string(change).context("Failed to serialize store state")?;
        println!("{}", line);
    }
    Ok(())
}
