//! Which popup panel is shown; lives in memory only

use std::rc::Rc;

use insights_flux::{BaseStore, FluxError, StateHolder, Store, StoreNames};

use super::listen;
use crate::actions::LaunchPanelStateActions;
use crate::state::{LaunchPanelStoreData, LaunchPanelType};

pub struct LaunchPanelStore {
    store: Rc<BaseStore<LaunchPanelStoreData>>,
    actions: Rc<LaunchPanelStateActions>,
}

impl LaunchPanelStore {
    pub fn new(actions: Rc<LaunchPanelStateActions>) -> Self {
        Self {
            store: Rc::new(BaseStore::new(StoreNames::LaunchPanelStateStore)),
            actions,
        }
    }
}

impl Store for LaunchPanelStore {
    type State = LaunchPanelStoreData;

    fn base(&self) -> &BaseStore<LaunchPanelStoreData> {
        &self.store
    }

    fn default_state(&self) -> LaunchPanelStoreData {
        LaunchPanelStoreData::default()
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        listen(&self.actions.set_launch_panel_type, id, &self.store, on_set_launch_panel_type)?;
        listen(&self.actions.get_current_state, id, &self.store, on_get_current_state)
    }
}

fn on_set_launch_panel_type(
    store: &BaseStore<LaunchPanelStoreData>,
    panel: LaunchPanelType,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.launch_panel_type = panel)?;
    Ok(())
}

fn on_get_current_state(store: &BaseStore<LaunchPanelStoreData>, _: ()) -> Result<(), FluxError> {
    store.emit_changed();
    Ok(())
}
