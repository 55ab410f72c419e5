//! In-memory key-value store, used when nothing should survive a restart

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use insights_flux::{BoxFuture, KeyValueStore, StorageError};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    items: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `items`
    pub fn with_items(items: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items.into_iter().collect())),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> BoxFuture<'static, Result<Option<Value>, StorageError>> {
        let result = self
            .items
            .lock()
            .map(|items| items.get(key).cloned())
            .map_err(|_| poisoned());
        Box::pin(async move { result })
    }

    fn set_item(&self, key: &str, value: Value) -> BoxFuture<'static, Result<(), StorageError>> {
        let result = self
            .items
            .lock()
            .map(|mut items| {
                items.insert(key.to_string(), value);
            })
            .map_err(|_| poisoned());
        Box::pin(async move { result })
    }

    fn remove_item(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>> {
        let result = self
            .items
            .lock()
            .map(|mut items| {
                items.remove(key);
            })
            .map_err(|_| poisoned());
        Box::pin(async move { result })
    }
}
