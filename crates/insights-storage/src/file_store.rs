//! File-backed key-value store
//!
//! Each key maps to one JSON file in a directory. Writes go to a unique
//! temporary file that is renamed over the target, so a reader never sees a
//! half-written record.
//!
//! Writes and removals of one key take effect in the order they were called,
//! even when their futures are polled out of order; a removal is never undone
//! by an older write finishing late. A failed write leaves no temporary file.
//!
//! Writes are counted from the moment `set_item` or `remove_item` is called
//! until their future finishes or is dropped, so a caller can wait for every
//! started write with [`FileKeyValueStore::wait_idle`] before shutting down.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use insights_flux::{BoxFuture, KeyValueStore, StorageError};
use serde_json::Value;
use tokio::sync::{oneshot, Notify};

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    write_seq: Arc<AtomicU64>,
    in_flight: Arc<InFlight>,
    turns: Arc<Mutex<HashMap<String, oneshot::Receiver<()>>>>,
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Marks one write as finished when dropped
struct WriteGuard(Arc<InFlight>);

impl WriteGuard {
    fn start(in_flight: &Arc<InFlight>) -> Self {
        in_flight.count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(in_flight))
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Place of one write in its key's queue
///
/// The next write of the same key proceeds once `done` is dropped.
struct KeyTurn {
    previous: Option<oneshot::Receiver<()>>,
    _done: oneshot::Sender<()>,
}

impl KeyTurn {
    async fn wait(&mut self) {
        if let Some(previous) = self.previous.take() {
            // Err only means the earlier write was dropped, which also frees the key
            let _ = previous.await;
        }
    }
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_seq: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::default(),
            turns: Arc::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of writes started but not yet finished
    pub fn pending_writes(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Resolve once no write is in flight
    ///
    /// Spawned writes only make progress while the runtime runs, so this must
    /// be awaited on the runtime that drives them.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.in_flight.idle.notified();
            if self.pending_writes() == 0 {
                return;
            }
            idle.await;
        }
    }

    fn take_turn(&self, key: &str) -> KeyTurn {
        let (done, next) = oneshot::channel();
        let previous = match self.turns.lock() {
            Ok(mut turns) => turns.insert(key.to_string(), next),
            Err(_) => {
                log::warn!("Write queue lock poisoned, '{}' is not ordered", key);
                None
            }
        };
        KeyTurn {
            previous,
            _done: done,
        }
    }

    /// File holding `key`; characters outside `[A-Za-z0-9_-]` become `_`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> BoxFuture<'static, Result<Option<Value>, StorageError>> {
        let key = key.to_string();
        let path = self.path_for(&key);

        Box::pin(async move {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(io_error(&key)(e)),
            };

            serde_json::from_str(&content)
                .map(Some)
                .map_err(|source| StorageError::Json { key, source })
        })
    }

    fn set_item(&self, key: &str, value: Value) -> BoxFuture<'static, Result<(), StorageError>> {
        let key = key.to_string();
        let path = self.path_for(&key);
        let dir = self.dir.clone();
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp_path = path.with_extension(format!("json.{}.tmp", seq));
        let guard = WriteGuard::start(&self.in_flight);
        let mut turn = self.take_turn(&key);

        Box::pin(async move {
            let _guard = guard;
            let content = serde_json::to_vec(&value).map_err(|source| StorageError::Serialize {
                key: key.clone(),
                source,
            })?;

            turn.wait().await;
            tokio::fs::create_dir_all(&dir).await.map_err(io_error(&key))?;
            let written = match tokio::fs::write(&tmp_path, content).await {
                Ok(()) => tokio::fs::rename(&tmp_path, &path).await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                    log::trace!("No temp file to clean up for '{}': {}", key, cleanup);
                }
                return Err(io_error(&key)(e));
            }

            log::trace!("Wrote '{}' to {:?}", key, path);
            Ok(())
        })
    }

    fn remove_item(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>> {
        let key = key.to_string();
        let path = self.path_for(&key);
        let guard = WriteGuard::start(&self.in_flight);
        let mut turn = self.take_turn(&key);

        Box::pin(async move {
            let _guard = guard;
            turn.wait().await;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(&key)(e)),
            }
        })
    }
}
