//! Hub of the stores bound to one browser tab

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{AnyStore, FluxError, HubLifecycle, KeyValueStore, Store, StoreHub, StoreType};

use super::{TabStore, VisualizationStore};
use crate::actions::TabContextActionHub;
use crate::notification::NotificationCreator;
use crate::persisted_data::TabPersistedData;

pub struct TabContextStoreHub {
    lifecycle: HubLifecycle,
    tab_id: i64,
    pub tab_store: TabStore,
    pub visualization_store: VisualizationStore,
}

impl TabContextStoreHub {
    pub fn new(
        actions: &TabContextActionHub,
        tab_id: i64,
        persisted: TabPersistedData,
        backend: Arc<dyn KeyValueStore>,
        persist_store_data: bool,
        notification_creator: Rc<dyn NotificationCreator>,
    ) -> Self {
        Self {
            lifecycle: HubLifecycle::new(),
            tab_id,
            tab_store: TabStore::new(
                Rc::clone(&actions.tab_actions),
                persisted.tab_store,
                Arc::clone(&backend),
                tab_id,
                persist_store_data,
            ),
            visualization_store: VisualizationStore::new(
                Rc::clone(&actions.visualization_actions),
                Rc::clone(&actions.tab_actions),
                Rc::clone(&actions.injection_actions),
                persisted.visualization_store,
                backend,
                tab_id,
                persist_store_data,
                notification_creator,
            ),
        }
    }

    pub fn tab_id(&self) -> i64 {
        self.tab_id
    }
}

impl StoreHub for TabContextStoreHub {
    fn initialize(&self) -> Result<(), FluxError> {
        self.lifecycle.begin_initialize(self.store_type())?;
        self.tab_store.initialize(None)?;
        self.visualization_store.initialize(None)
    }

    fn all_stores(&self) -> Vec<&dyn AnyStore> {
        vec![&self.tab_store, &self.visualization_store]
    }

    fn store_type(&self) -> StoreType {
        StoreType::TabContextStore
    }
}
