//! Test helpers for stores and persistence
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for dependent crates' dev-dependencies.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::key_value::{BoxFuture, KeyValueStore, StorageError};
use crate::store::{AnyStore, ChangeListener};

/// Counts change notifications of one store
#[derive(Clone, Default)]
pub struct ListenerProbe {
    calls: Rc<Cell<usize>>,
}

impl ListenerProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a probe and subscribe it to `store`
    pub fn attach(store: &dyn AnyStore) -> Self {
        let probe = Self::new();
        store.subscribe(probe.listener());
        probe
    }

    pub fn listener(&self) -> ChangeListener {
        let calls = Rc::clone(&self.calls);
        Rc::new(move || calls.set(calls.get() + 1))
    }

    pub fn count(&self) -> usize {
        self.calls.get()
    }
}

/// Backend that records every `set_item` at call time
///
/// Reads are served from the recorded writes. With `failing()` every write
/// resolves to an error after being recorded.
#[derive(Clone, Default)]
pub struct RecordingKeyValueStore {
    writes: Arc<Mutex<Vec<(String, Value)>>>,
    fail_writes: bool,
}

impl RecordingKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            writes: Arc::default(),
            fail_writes: true,
        }
    }

    /// All `(key, value)` pairs passed to `set_item`, in call order
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn writes_for(&self, key: &str) -> Vec<Value> {
        self.writes()
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }
}

impl KeyValueStore for RecordingKeyValueStore {
    fn get_item(&self, key: &str) -> BoxFuture<'static, Result<Option<Value>, StorageError>> {
        let latest = self.writes_for(key).pop();
        Box::pin(async move { Ok(latest) })
    }

    fn set_item(&self, key: &str, value: Value) -> BoxFuture<'static, Result<(), StorageError>> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((key.to_string(), value));
        }

        let result = if self.fail_writes {
            Err(StorageError::Unavailable(format!("refusing write to '{}'", key)))
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }

    fn remove_item(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.retain(|(k, _)| k != key);
        }
        Box::pin(async { Ok(()) })
    }
}
