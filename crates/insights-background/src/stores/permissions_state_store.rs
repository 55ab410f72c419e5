//! Browser permission state, persisted under `permissionsStateStore`

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{
    BaseStore, FluxError, KeyValueStore, PersistentStore, StateHolder, Store, StoreNames,
};

use super::listen;
use crate::actions::PermissionsStateActions;
use crate::data_keys;
use crate::state::PermissionsStateStoreData;

type Container = PersistentStore<PermissionsStateStoreData>;

pub struct PermissionsStateStore {
    store: Rc<Container>,
    actions: Rc<PermissionsStateActions>,
}

impl PermissionsStateStore {
    pub fn new(
        actions: Rc<PermissionsStateActions>,
        persisted: Option<PermissionsStateStoreData>,
        backend: Arc<dyn KeyValueStore>,
        persist_store_data: bool,
    ) -> Self {
        Self {
            store: Rc::new(PersistentStore::new(
                StoreNames::PermissionsStateStore,
                persisted,
                backend,
                data_keys::PERMISSIONS_STATE_STORE,
                persist_store_data,
            )),
            actions,
        }
    }
}

impl Store for PermissionsStateStore {
    type State = PermissionsStateStoreData;

    fn base(&self) -> &BaseStore<PermissionsStateStoreData> {
        self.store.base()
    }

    fn default_state(&self) -> PermissionsStateStoreData {
        self.store.persisted_state().cloned().unwrap_or_default()
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        listen(&self.actions.set_permissions_state, id, &self.store, on_set_permissions_state)?;
        listen(&self.actions.get_current_state, id, &self.store, on_get_current_state)
    }
}

fn on_set_permissions_state(store: &Container, granted: bool) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.has_all_url_and_file_permissions = granted)?;
    Ok(())
}

fn on_get_current_state(store: &Container, _: ()) -> Result<(), FluxError> {
    store.emit_changed();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_flux::testing::{ListenerProbe, RecordingKeyValueStore};
    use serde_json::json;

    #[test]
    fn test_set_permissions_state_emits_on_change_only() {
        let actions = Rc::new(PermissionsStateActions::default());
        let backend = RecordingKeyValueStore::new();
        let store = PermissionsStateStore::new(
            Rc::clone(&actions),
            None,
            Arc::new(backend.clone()),
            true,
        );
        store.initialize(None).unwrap();
        let probe = ListenerProbe::attach(&store);

        actions.set_permissions_state.invoke(false).unwrap();
        assert_eq!(probe.count(), 0);

        actions.set_permissions_state.invoke(true).unwrap();
        assert_eq!(probe.count(), 1);
        assert!(store.state().unwrap().has_all_url_and_file_permissions);
        assert_eq!(
            backend.writes_for("permissionsStateStore"),
            vec![json!({ "hasAllUrlAndFilePermissions": true })]
        );
    }

    #[test]
    fn test_restores_persisted_state() {
        let store = PermissionsStateStore::new(
            Rc::new(PermissionsStateActions::default()),
            Some(PermissionsStateStoreData {
                has_all_url_and_file_permissions: true,
            }),
            Arc::new(RecordingKeyValueStore::new()),
            true,
        );
        store.initialize(None).unwrap();

        assert!(store.state().unwrap().has_all_url_and_file_permissions);
    }
}
