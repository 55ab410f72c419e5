//! Include/exclude selectors, persisted under `scopingStore`

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{
    BaseStore, FluxError, KeyValueStore, PersistentStore, StateHolder, Store, StoreNames,
};

use super::listen;
use crate::actions::payloads::ScopingPayload;
use crate::actions::ScopingActions;
use crate::data_keys;
use crate::state::ScopingStoreData;

type Container = PersistentStore<ScopingStoreData>;

pub struct ScopingStore {
    store: Rc<Container>,
    actions: Rc<ScopingActions>,
}

impl ScopingStore {
    pub fn new(
        actions: Rc<ScopingActions>,
        persisted: Option<ScopingStoreData>,
        backend: Arc<dyn KeyValueStore>,
        persist_store_data: bool,
    ) -> Self {
        Self {
            store: Rc::new(PersistentStore::new(
                StoreNames::ScopingStore,
                persisted,
                backend,
                data_keys::SCOPING_STORE,
                persist_store_data,
            )),
            actions,
        }
    }
}

impl Store for ScopingStore {
    type State = ScopingStoreData;

    fn base(&self) -> &BaseStore<ScopingStoreData> {
        self.store.base()
    }

    fn default_state(&self) -> ScopingStoreData {
        self.store.persisted_state().cloned().unwrap_or_default()
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        listen(&self.actions.add_selector, id, &self.store, on_add_selector)?;
        listen(&self.actions.delete_selector, id, &self.store, on_delete_selector)?;
        listen(&self.actions.get_current_state, id, &self.store, on_get_current_state)
    }
}

fn on_add_selector(store: &Container, payload: ScopingPayload) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        let list = state.selectors.list_mut(payload.input_type);
        if !list.contains(&payload.selector) {
            list.push(payload.selector);
        }
    })?;
    Ok(())
}

fn on_delete_selector(store: &Container, payload: ScopingPayload) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state
            .selectors
            .list_mut(payload.input_type)
            .retain(|selector| *selector != payload.selector);
    })?;
    Ok(())
}

fn on_get_current_state(store: &Container, _: ()) -> Result<(), FluxError> {
    store.emit_changed();
    Ok(())
}
