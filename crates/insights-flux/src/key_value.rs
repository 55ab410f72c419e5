//! Durable key-value backend used by persistent stores
//!
//! Backends return boxed futures instead of being `async fn`s so that the
//! call itself happens synchronously at the point where a store decides to
//! persist. The returned future carries the write to completion and is
//! `'static`, which lets the store spawn it without waiting.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

/// BoxFuture type alias for backend operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors reported by a key-value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for key '{key}'")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON stored under key '{key}'")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for key '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable key-value store, shared by every persistent store
///
/// Keys are partitioned per store; no two persistent stores share a key.
/// Concurrent writes to one key resolve last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> BoxFuture<'static, Result<Option<Value>, StorageError>>;

    fn set_item(&self, key: &str, value: Value) -> BoxFuture<'static, Result<(), StorageError>>;

    fn remove_item(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>>;
}
