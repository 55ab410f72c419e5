//! Hub of the process-wide stores

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{AnyStore, FluxError, HubLifecycle, KeyValueStore, Store, StoreHub, StoreType};

use super::{
    FeatureFlagStore, LaunchPanelStore, PermissionsStateStore, ScopingStore,
    UserConfigurationStore,
};
use crate::actions::GlobalActionHub;
use crate::persisted_data::PersistedData;

pub struct GlobalStoreHub {
    lifecycle: HubLifecycle,
    pub feature_flag_store: FeatureFlagStore,
    pub launch_panel_store: LaunchPanelStore,
    pub scoping_store: ScopingStore,
    pub user_configuration_store: UserConfigurationStore,
    pub permissions_state_store: PermissionsStateStore,
}

impl GlobalStoreHub {
    pub fn new(
        actions: &GlobalActionHub,
        persisted: &PersistedData,
        backend: Arc<dyn KeyValueStore>,
        persist_store_data: bool,
    ) -> Self {
        Self {
            lifecycle: HubLifecycle::new(),
            feature_flag_store: FeatureFlagStore::new(
                Rc::clone(&actions.feature_flag_actions),
                persisted.feature_flags.clone(),
                Arc::clone(&backend),
                persist_store_data,
            ),
            launch_panel_store: LaunchPanelStore::new(Rc::clone(
                &actions.launch_panel_state_actions,
            )),
            scoping_store: ScopingStore::new(
                Rc::clone(&actions.scoping_actions),
                persisted.scoping.clone(),
                Arc::clone(&backend),
                persist_store_data,
            ),
            user_configuration_store: UserConfigurationStore::new(
                Rc::clone(&actions.user_configuration_actions),
                persisted.user_configuration.clone(),
                Arc::clone(&backend),
                persist_store_data,
            ),
            permissions_state_store: PermissionsStateStore::new(
                Rc::clone(&actions.permissions_state_actions),
                persisted.permissions_state.clone(),
                backend,
                persist_store_data,
            ),
        }
    }
}

impl StoreHub for GlobalStoreHub {
    fn initialize(&self) -> Result<(), FluxError> {
        self.lifecycle.begin_initialize(self.store_type())?;
        self.feature_flag_store.initialize(None)?;
        self.launch_panel_store.initialize(None)?;
        self.scoping_store.initialize(None)?;
        self.user_configuration_store.initialize(None)?;
        self.permissions_state_store.initialize(None)
    }

    fn all_stores(&self) -> Vec<&dyn AnyStore> {
        vec![
            &self.feature_flag_store,
            &self.launch_panel_store,
            &self.scoping_store,
            &self.user_configuration_store,
            &self.permissions_state_store,
        ]
    }

    fn store_type(&self) -> StoreType {
        StoreType::GlobalStore
    }
}
