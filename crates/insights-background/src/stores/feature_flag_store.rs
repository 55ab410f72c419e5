//! Feature flags, persisted under `featureFlags`

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{
    BaseStore, FluxError, KeyValueStore, PersistentStore, StateHolder, Store, StoreNames,
};

use super::listen;
use crate::actions::payloads::FeatureFlagPayload;
use crate::actions::FeatureFlagActions;
use crate::data_keys;
use crate::state::feature_flags::{default_feature_flag_values, force_default_flags};
use crate::state::FeatureFlagStoreData;

type Container = PersistentStore<FeatureFlagStoreData>;

pub struct FeatureFlagStore {
    store: Rc<Container>,
    actions: Rc<FeatureFlagActions>,
}

impl FeatureFlagStore {
    pub fn new(
        actions: Rc<FeatureFlagActions>,
        persisted: Option<FeatureFlagStoreData>,
        backend: Arc<dyn KeyValueStore>,
        persist_store_data: bool,
    ) -> Self {
        Self {
            store: Rc::new(PersistentStore::new(
                StoreNames::FeatureFlagStore,
                persisted,
                backend,
                data_keys::FEATURE_FLAGS,
                persist_store_data,
            )),
            actions,
        }
    }
}

/// Flag defaults, overlaid by persisted values, with force-default flags reset
pub fn feature_flag_default_state(
    persisted: Option<&FeatureFlagStoreData>,
) -> FeatureFlagStoreData {
    let mut state = default_feature_flag_values();
    if let Some(persisted) = persisted {
        state.extend(persisted.iter().map(|(name, on)| (name.clone(), *on)));
    }

    let defaults = default_feature_flag_values();
    for name in force_default_flags() {
        if let Some(&default) = defaults.get(name) {
            state.insert(name.to_string(), default);
        }
    }
    state
}

impl Store for FeatureFlagStore {
    type State = FeatureFlagStoreData;

    fn base(&self) -> &BaseStore<FeatureFlagStoreData> {
        self.store.base()
    }

    fn default_state(&self) -> FeatureFlagStoreData {
        feature_flag_default_state(self.store.persisted_state())
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        listen(&self.actions.set_feature_flag, id, &self.store, on_set_feature_flag)?;
        listen(&self.actions.reset_feature_flags, id, &self.store, on_reset_feature_flags)?;
        listen(&self.actions.get_current_state, id, &self.store, on_get_current_state)
    }
}

fn on_set_feature_flag(store: &Container, payload: FeatureFlagPayload) -> Result<(), FluxError> {
    let changed = store.update_and_emit(|flags| {
        flags.insert(payload.feature.clone(), payload.enabled);
    })?;
    if changed {
        log::debug!("Feature flag '{}' set to {}", payload.feature, payload.enabled);
    }
    Ok(())
}

fn on_reset_feature_flags(store: &Container, _: ()) -> Result<(), FluxError> {
    store.replace_state(default_feature_flag_values());
    store.emit_changed();
    Ok(())
}

fn on_get_current_state(store: &Container, _: ()) -> Result<(), FluxError> {
    store.emit_changed();
    Ok(())
}
