//! PersistentStore - a store that writes a snapshot after every change
//!
//! Every `emit_changed()` serializes the current state, hands it to the
//! [`KeyValueStore`] under the store's fixed key and spawns the resulting
//! write on the ambient tokio runtime. Listeners are notified right after,
//! on the same call stack, whatever the write eventually does.
//!
//! A failed write is logged and dropped. The next change writes fresh data,
//! so there is no retry here. Writes are not sequenced: two quick changes may
//! land in the backend in either order.

use std::sync::Arc;

use serde::Serialize;

use crate::key_value::{BoxFuture, KeyValueStore, StorageError};
use crate::store::{BaseStore, StateHolder};
use crate::store_names::StoreNames;

/// Write produced by [`PersistentStore::persist_data`]
pub type PersistFuture = BoxFuture<'static, Result<(), StorageError>>;

pub struct PersistentStore<S> {
    base: BaseStore<S>,
    persisted_state: Option<S>,
    backend: Arc<dyn KeyValueStore>,
    key: String,
    persist_store_data: bool,
}

impl<S: Serialize> PersistentStore<S> {
    /// Create a persistent store
    ///
    /// # Arguments
    ///
    /// * `id` - Store name
    /// * `persisted_state` - Snapshot restored at bootstrap, if any
    /// * `backend` - Shared durable backend
    /// * `key` - Fixed key this store writes under
    /// * `persist_store_data` - When `false` the store behaves like a plain store
    pub fn new(
        id: StoreNames,
        persisted_state: Option<S>,
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        persist_store_data: bool,
    ) -> Self {
        Self {
            base: BaseStore::new(id),
            persisted_state,
            backend,
            key: key.into(),
            persist_store_data,
        }
    }

    /// Snapshot supplied at construction, used to derive the default state
    pub fn persisted_state(&self) -> Option<&S> {
        self.persisted_state.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize `data` and start writing it under this store's key
    ///
    /// The backend is called before this returns; awaiting the returned
    /// future is optional.
    pub fn persist_data(&self, data: &S) -> PersistFuture {
        match serde_json::to_value(data) {
            Ok(value) => self.backend.set_item(&self.key, value),
            Err(source) => {
                let key = self.key.clone();
                Box::pin(async move { Err(StorageError::Serialize { key, source }) })
            }
        }
    }

    fn persist_current_state(&self) {
        match self.base.with_state(|state| self.persist_data(state)) {
            Ok(write) => spawn_write(self.key.clone(), write),
            Err(e) => log::error!("{}: nothing to persist: {}", self.base.id(), e),
        }
    }
}

impl<S: Serialize> StateHolder<S> for PersistentStore<S> {
    fn base(&self) -> &BaseStore<S> {
        &self.base
    }

    fn emit_changed(&self) {
        if self.persist_store_data {
            self.persist_current_state();
        }
        self.base.emit_changed();
    }
}

/// Drive a backend write to completion without blocking the caller
///
/// `label` names the write in log lines. Outside a tokio runtime the write is
/// dropped with a warning; failures are logged, never returned.
pub fn spawn_write(label: impl Into<String>, write: PersistFuture) {
    let label = label.into();
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        log::warn!("No async runtime available, dropping write for '{}'", label);
        return;
    };

    handle.spawn(async move {
        match write.await {
            Ok(()) => log::trace!("Persisted '{}'", label),
            Err(e) => log::error!("Failed to persist '{}': {}", label, e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::error::FluxError;
    use crate::store::Store;
    use crate::testing::{ListenerProbe, RecordingKeyValueStore};
    use serde::Deserialize;
    use serde_json::json;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct NotesState {
        notes: Vec<String>,
    }

    struct NotesStore {
        store: Rc<PersistentStore<NotesState>>,
        add_note: Rc<Action<String>>,
    }

    impl NotesStore {
        fn new(
            backend: Arc<dyn KeyValueStore>,
            persisted: Option<NotesState>,
            add_note: Rc<Action<String>>,
        ) -> Self {
            Self {
                store: Rc::new(PersistentStore::new(
                    StoreNames::ScopingStore,
                    persisted,
                    backend,
                    "k",
                    true,
                )),
                add_note,
            }
        }
    }

    impl Store for NotesStore {
        type State = NotesState;

        fn base(&self) -> &BaseStore<NotesState> {
            self.store.base()
        }

        fn default_state(&self) -> NotesState {
            self.store.persisted_state().cloned().unwrap_or_default()
        }

        fn add_action_listeners(&self) -> Result<(), FluxError> {
            let store = Rc::clone(&self.store);
            self.add_note.add_listener(self.id(), move |note| {
                store.update(|state| state.notes.push(note))?;
                store.emit_changed();
                Ok(())
            })
        }
    }

    fn notes_store(backend: &RecordingKeyValueStore) -> (NotesStore, Rc<Action<String>>) {
        let add_note = Rc::new(Action::new("addNote"));
        let store = NotesStore::new(Arc::new(backend.clone()), None, Rc::clone(&add_note));
        store.initialize(None).unwrap();
        (store, add_note)
    }

    #[test]
    fn test_each_change_writes_its_own_snapshot() {
        let backend = RecordingKeyValueStore::new();
        let (_store, add_note) = notes_store(&backend);

        add_note.invoke("first".to_string()).unwrap();
        add_note.invoke("second".to_string()).unwrap();

        assert_eq!(
            backend.writes(),
            vec![
                ("k".to_string(), json!({ "notes": ["first"] })),
                ("k".to_string(), json!({ "notes": ["first", "second"] })),
            ]
        );
    }

    #[test]
    fn test_listeners_notified_without_runtime() {
        let backend = RecordingKeyValueStore::new();
        let (store, add_note) = notes_store(&backend);
        let probe = ListenerProbe::attach(&store);

        add_note.invoke("offline".to_string()).unwrap();

        assert_eq!(probe.count(), 1);
        assert_eq!(backend.writes_for("k").len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_reach_caller() {
        let backend = RecordingKeyValueStore::failing();
        let (store, add_note) = notes_store(&backend);
        let probe = ListenerProbe::attach(&store);

        add_note.invoke("doomed".to_string()).unwrap();
        // Let the spawned write run and fail
        tokio::task::yield_now().await;

        assert_eq!(probe.count(), 1);
        assert_eq!(store.state().unwrap().notes, vec!["doomed".to_string()]);
        assert_eq!(backend.writes_for("k").len(), 1);
    }

    #[tokio::test]
    async fn test_persist_data_can_be_awaited() {
        let backend = RecordingKeyValueStore::new();
        let (store, _add_note) = notes_store(&backend);

        let data = NotesState {
            notes: vec!["direct".to_string()],
        };
        store.store.persist_data(&data).await.unwrap();

        let stored = backend.get_item("k").await.unwrap();
        assert_eq!(stored, Some(json!({ "notes": ["direct"] })));
    }

    #[test]
    fn test_disabled_persistence_skips_backend() {
        let backend = RecordingKeyValueStore::new();
        let store: PersistentStore<NotesState> = PersistentStore::new(
            StoreNames::ScopingStore,
            None,
            Arc::new(backend.clone()),
            "k",
            false,
        );
        store.replace_state(NotesState::default());

        store.emit_changed();

        assert!(backend.writes().is_empty());
    }

    #[test]
    fn test_default_state_prefers_persisted_snapshot() {
        let backend = RecordingKeyValueStore::new();
        let persisted = NotesState {
            notes: vec!["restored".to_string()],
        };
        let store = NotesStore::new(
            Arc::new(backend),
            Some(persisted.clone()),
            Rc::new(Action::new("addNote")),
        );

        assert_eq!(store.default_state(), persisted);
        assert_eq!(store.default_state(), store.default_state());
    }
}
