//! User preferences, persisted under `userConfiguration`
//!
//! Persisted records are decoded with field defaults, so a snapshot written
//! by an older build still yields a complete configuration.

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{
    BaseStore, FluxError, KeyValueStore, PersistentStore, StateHolder, Store, StoreNames,
};

use super::listen;
use crate::actions::payloads::{
    SaveIssueFilingSettingsPayload, SaveWindowBoundsPayload, SetHighContrastModePayload,
    SetIssueFilingServicePayload, SetIssueFilingServicePropertyPayload,
};
use crate::actions::UserConfigurationActions;
use crate::data_keys;
use crate::state::{UserConfigurationStoreData, WindowState};

type Container = PersistentStore<UserConfigurationStoreData>;

pub struct UserConfigurationStore {
    store: Rc<Container>,
    actions: Rc<UserConfigurationActions>,
}

impl UserConfigurationStore {
    pub fn new(
        actions: Rc<UserConfigurationActions>,
        persisted: Option<UserConfigurationStoreData>,
        backend: Arc<dyn KeyValueStore>,
        persist_store_data: bool,
    ) -> Self {
        Self {
            store: Rc::new(PersistentStore::new(
                StoreNames::UserConfigurationStore,
                persisted,
                backend,
                data_keys::USER_CONFIGURATION,
                persist_store_data,
            )),
            actions,
        }
    }
}

impl Store for UserConfigurationStore {
    type State = UserConfigurationStoreData;

    fn base(&self) -> &BaseStore<UserConfigurationStoreData> {
        self.store.base()
    }

    fn default_state(&self) -> UserConfigurationStoreData {
        self.store.persisted_state().cloned().unwrap_or_default()
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        let actions = &self.actions;
        listen(&actions.get_current_state, id, &self.store, on_get_current_state)?;
        listen(&actions.set_adb_location, id, &self.store, on_set_adb_location)?;
        listen(&actions.set_telemetry_state, id, &self.store, on_set_telemetry_state)?;
        listen(&actions.set_high_contrast_mode, id, &self.store, on_set_high_contrast_mode)?;
        listen(
            &actions.set_native_high_contrast_mode,
            id,
            &self.store,
            on_set_native_high_contrast_mode,
        )?;
        listen(&actions.set_issue_filing_service, id, &self.store, on_set_issue_filing_service)?;
        listen(
            &actions.set_issue_filing_service_property,
            id,
            &self.store,
            on_set_issue_filing_service_property,
        )?;
        listen(&actions.save_issue_filing_settings, id, &self.store, on_save_issue_filing_settings)?;
        listen(&actions.save_window_bounds, id, &self.store, on_save_window_bounds)?;
        listen(
            &actions.set_auto_detected_failures_dialog_state,
            id,
            &self.store,
            on_set_auto_detected_failures_dialog_state,
        )
    }
}

fn on_get_current_state(store: &Container, _: ()) -> Result<(), FluxError> {
    store.emit_changed();
    Ok(())
}

fn on_set_adb_location(store: &Container, location: String) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.adb_location = Some(location))?;
    Ok(())
}

fn on_set_telemetry_state(store: &Container, enable_telemetry: bool) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.is_first_time = false;
        state.enable_telemetry = enable_telemetry;
    })?;
    Ok(())
}

fn on_set_high_contrast_mode(
    store: &Container,
    payload: SetHighContrastModePayload,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.enable_high_contrast = payload.enable_high_contrast;
        state.last_selected_high_contrast = payload.enable_high_contrast;
    })?;
    Ok(())
}

/// The OS forcing high contrast wins; leaving it restores the user's choice
fn on_set_native_high_contrast_mode(
    store: &Container,
    payload: SetHighContrastModePayload,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.enable_high_contrast =
            payload.enable_high_contrast || state.last_selected_high_contrast;
    })?;
    Ok(())
}

fn on_set_issue_filing_service(
    store: &Container,
    payload: SetIssueFilingServicePayload,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.bug_service = payload.issue_filing_service_name)?;
    Ok(())
}

fn on_set_issue_filing_service_property(
    store: &Container,
    payload: SetIssueFilingServicePropertyPayload,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state
            .bug_service_properties_map
            .entry(payload.issue_filing_service_name)
            .or_default()
            .insert(payload.property_name, payload.property_value);
    })?;
    Ok(())
}

fn on_save_issue_filing_settings(
    store: &Container,
    payload: SaveIssueFilingSettingsPayload,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.bug_service = payload.issue_filing_service_name.clone();
        state
            .bug_service_properties_map
            .insert(payload.issue_filing_service_name, payload.issue_filing_settings);
    })?;
    Ok(())
}

fn on_save_window_bounds(
    store: &Container,
    payload: SaveWindowBoundsPayload,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.last_window_state = Some(payload.window_state);
        // Bounds of a maximized or minimized window are not worth restoring
        if payload.window_state == WindowState::Normal {
            state.last_window_bounds = Some(payload.window_bounds);
        }
    })?;
    Ok(())
}

fn on_set_auto_detected_failures_dialog_state(
    store: &Container,
    enabled: bool,
) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.show_auto_detected_failures_dialog = enabled)?;
    Ok(())
}
