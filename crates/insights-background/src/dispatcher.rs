//! Routing inbound messages onto hub actions
//!
//! The [`Dispatcher`] owns the global hub and one hub per known tab. Each
//! [`ActionMessage`] is translated into one or more action invocations; after
//! it has run, the dispatcher reports which stores announced a change.
//!
//! Tab hubs are created on the first message that names their tab and the
//! tab is recorded under `knownTabIds`, so its stores are restored on the
//! next start. A removed tab's hub is dropped after its changes are reported
//! and its records are deleted from the backend. Removing a tab without a
//! context is ignored.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use insights_flux::{spawn_write, AnyStore, KeyValueStore, StoreHub, StoreNames};
use serde::{Deserialize, Serialize};

use crate::actions::payloads::{
    FeatureFlagPayload, SaveIssueFilingSettingsPayload, SaveWindowBoundsPayload, ScopingPayload,
    SetHighContrastModePayload, SetIssueFilingServicePayload,
    SetIssueFilingServicePropertyPayload, TabPayload, ToggleActionPayload,
    UpdateSelectedDetailsViewPayload, UpdateSelectedPivotPayload,
};
use crate::actions::{GlobalActionHub, TabContextActionHub};
use crate::data_keys;
use crate::notification::NotificationCreator;
use crate::persisted_data::{KnownTabIds, PersistedData};
use crate::state::{LaunchPanelType, VisualizationType};
use crate::stores::{GlobalStoreHub, TabContextStoreHub};

/// Inbound message, tagged by `type`
///
/// Messages for tab-scoped stores carry the `tabId` they apply to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionMessage {
    // Feature flags
    SetFeatureFlag(FeatureFlagPayload),
    ResetFeatureFlags,
    GetFeatureFlags,

    // Launch panel
    SetLaunchPanelType {
        launch_panel_type: LaunchPanelType,
    },
    GetLaunchPanelState,

    // Scoping
    AddSelector(ScopingPayload),
    DeleteSelector(ScopingPayload),
    GetScopingState,

    // User configuration
    SetTelemetryState {
        enable_telemetry: bool,
    },
    SetHighContrastMode(SetHighContrastModePayload),
    SetNativeHighContrastMode(SetHighContrastModePayload),
    SetIssueFilingService(SetIssueFilingServicePayload),
    SetIssueFilingServiceProperty(SetIssueFilingServicePropertyPayload),
    SaveIssueFilingSettings(SaveIssueFilingSettingsPayload),
    SaveWindowBounds(SaveWindowBoundsPayload),
    SetAdbLocation {
        adb_location: String,
    },
    SetAutoDetectedFailuresDialogState {
        enabled: bool,
    },
    GetUserConfiguration,

    // Permissions
    SetPermissionsState {
        has_all_url_and_file_permissions: bool,
    },
    GetPermissionsState,

    // Tab
    NewTabCreated {
        tab_id: i64,
        #[serde(flatten)]
        tab: TabPayload,
    },
    TabUpdate {
        tab_id: i64,
        #[serde(flatten)]
        tab: TabPayload,
    },
    TabRemove {
        tab_id: i64,
    },
    TabChange {
        tab_id: i64,
        #[serde(flatten)]
        tab: TabPayload,
    },
    TabVisibilityChange {
        tab_id: i64,
        hidden: bool,
    },
    ExistingTabUpdated {
        tab_id: i64,
        #[serde(flatten)]
        tab: TabPayload,
    },
    GetTabState {
        tab_id: i64,
    },

    // Visualization
    EnableVisualization {
        tab_id: i64,
        #[serde(flatten)]
        toggle: ToggleActionPayload,
    },
    EnableVisualizationWithoutScan {
        tab_id: i64,
        #[serde(flatten)]
        toggle: ToggleActionPayload,
    },
    DisableVisualization {
        tab_id: i64,
        test: VisualizationType,
    },
    DisableAssessmentVisualizations {
        tab_id: i64,
    },
    ScanCompleted {
        tab_id: i64,
    },
    UpdateFocusedInstance {
        tab_id: i64,
        target: Vec<String>,
    },
    ScrollRequested {
        tab_id: i64,
    },
    UpdateSelectedPivot {
        tab_id: i64,
        #[serde(flatten)]
        payload: UpdateSelectedPivotPayload,
    },
    UpdateSelectedPivotChild {
        tab_id: i64,
        #[serde(flatten)]
        payload: UpdateSelectedDetailsViewPayload,
    },
    GetVisualizationState {
        tab_id: i64,
    },

    // Injection
    InjectionStarted {
        tab_id: i64,
    },
    InjectionCompleted {
        tab_id: i64,
    },
    InjectionFailed {
        tab_id: i64,
    },
}

impl ActionMessage {
    /// Tab this message applies to, `None` for global messages
    pub fn tab_id(&self) -> Option<i64> {
        use ActionMessage::*;

        match self {
            NewTabCreated { tab_id, .. }
            | TabUpdate { tab_id, .. }
            | TabRemove { tab_id }
            | TabChange { tab_id, .. }
            | TabVisibilityChange { tab_id, .. }
            | ExistingTabUpdated { tab_id, .. }
            | GetTabState { tab_id }
            | EnableVisualization { tab_id, .. }
            | EnableVisualizationWithoutScan { tab_id, .. }
            | DisableVisualization { tab_id, .. }
            | DisableAssessmentVisualizations { tab_id }
            | ScanCompleted { tab_id }
            | UpdateFocusedInstance { tab_id, .. }
            | ScrollRequested { tab_id }
            | UpdateSelectedPivot { tab_id, .. }
            | UpdateSelectedPivotChild { tab_id, .. }
            | GetVisualizationState { tab_id }
            | InjectionStarted { tab_id }
            | InjectionCompleted { tab_id }
            | InjectionFailed { tab_id } => Some(*tab_id),
            _ => None,
        }
    }

    /// URL carried by tab lifecycle messages
    fn tab_url(&self) -> Option<&str> {
        match self {
            ActionMessage::NewTabCreated { tab, .. }
            | ActionMessage::TabUpdate { tab, .. }
            | ActionMessage::TabChange { tab, .. }
            | ActionMessage::ExistingTabUpdated { tab, .. } => tab.url.as_deref(),
            _ => None,
        }
    }
}

/// State of one store after it announced a change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreChange {
    pub store: StoreNames,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,
    pub state: serde_json::Value,
}

type ChangeKey = (Option<i64>, StoreNames);

/// Records which stores emitted since the last [`ChangeTracker::take`]
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    changed: Rc<RefCell<Vec<ChangeKey>>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every store of `hub`
    pub fn watch(&self, hub: &dyn StoreHub, tab_id: Option<i64>) {
        for store in hub.all_stores() {
            let key = (tab_id, store.store_id());
            let changed = Rc::clone(&self.changed);
            store.subscribe(Rc::new(move || {
                let mut changed = changed.borrow_mut();
                if !changed.contains(&key) {
                    changed.push(key);
                }
            }));
        }
    }

    /// Changed stores in the order they first emitted
    pub fn take(&self) -> Vec<ChangeKey> {
        std::mem::take(&mut *self.changed.borrow_mut())
    }
}

struct TabContext {
    actions: TabContextActionHub,
    hub: TabContextStoreHub,
}

pub struct Dispatcher {
    backend: Arc<dyn KeyValueStore>,
    persisted: PersistedData,
    persist_store_data: bool,
    notification_creator: Rc<dyn NotificationCreator>,
    global_actions: GlobalActionHub,
    global_hub: GlobalStoreHub,
    tabs: BTreeMap<i64, TabContext>,
    known_tab_ids: KnownTabIds,
    tracker: ChangeTracker,
}

impl Dispatcher {
    /// Build and initialize the global hub and a hub for every known tab
    pub fn new(
        backend: Arc<dyn KeyValueStore>,
        persisted: PersistedData,
        persist_store_data: bool,
        notification_creator: Rc<dyn NotificationCreator>,
    ) -> Result<Self> {
        let global_actions = GlobalActionHub::new();
        let global_hub = GlobalStoreHub::new(
            &global_actions,
            &persisted,
            Arc::clone(&backend),
            persist_store_data,
        );
        global_hub
            .initialize()
            .context("Failed to initialize global store hub")?;

        let tracker = ChangeTracker::new();
        tracker.watch(&global_hub, None);

        let known_tab_ids = persisted.known_tab_ids.clone();
        let mut dispatcher = Self {
            backend,
            persisted,
            persist_store_data,
            notification_creator,
            global_actions,
            global_hub,
            tabs: BTreeMap::new(),
            known_tab_ids,
            tracker,
        };

        let restored: Vec<i64> = dispatcher.known_tab_ids.keys().copied().collect();
        for tab_id in restored {
            dispatcher.create_tab(tab_id)?;
        }
        log::info!(
            "Dispatcher ready with {} restored tab(s)",
            dispatcher.tabs.len()
        );

        Ok(dispatcher)
    }

    pub fn global_hub(&self) -> &GlobalStoreHub {
        &self.global_hub
    }

    pub fn tab_hub(&self, tab_id: i64) -> Option<&TabContextStoreHub> {
        self.tabs.get(&tab_id).map(|tab| &tab.hub)
    }

    pub fn known_tab_ids(&self) -> &KnownTabIds {
        &self.known_tab_ids
    }

    /// Current state of every store, global hub first
    pub fn snapshot(&self) -> Result<Vec<StoreChange>> {
        let mut all = Vec::new();
        for store in self.global_hub.all_stores() {
            all.push(store_change(store, None)?);
        }
        for (tab_id, tab) in &self.tabs {
            for store in tab.hub.all_stores() {
                all.push(store_change(store, Some(*tab_id))?);
            }
        }
        Ok(all)
    }

    /// Apply one message and report the stores it changed
    pub fn apply(&mut self, message: ActionMessage) -> Result<Vec<StoreChange>> {
        log::debug!("Applying {:?}", message);
        let removed_tab = match &message {
            ActionMessage::TabRemove { tab_id } => Some(*tab_id),
            _ => None,
        };

        let result = self.dispatch(message);
        // Report whatever ran, even when a later invocation failed
        let changes = self.collect_changes();
        result?;
        let changes = changes?;

        if let Some(tab_id) = removed_tab {
            self.remove_tab(tab_id);
        }
        Ok(changes)
    }

    fn dispatch(&mut self, message: ActionMessage) -> Result<()> {
        if let Some(tab_id) = message.tab_id() {
            let removes_unknown_tab = matches!(message, ActionMessage::TabRemove { .. })
                && !self.tabs.contains_key(&tab_id);
            if removes_unknown_tab {
                log::debug!("Ignoring removal of unknown tab {}", tab_id);
                return Ok(());
            }
            let url = message.tab_url().map(str::to_string);
            self.ensure_tab(tab_id, url)?;
            return self.dispatch_tab(tab_id, message);
        }
        self.dispatch_global(message)
    }

    fn dispatch_global(&self, message: ActionMessage) -> Result<()> {
        use ActionMessage::*;

        let a = &self.global_actions;
        let result = match message {
            SetFeatureFlag(payload) => a.feature_flag_actions.set_feature_flag.invoke(payload),
            ResetFeatureFlags => a.feature_flag_actions.reset_feature_flags.invoke(()),
            GetFeatureFlags => a.feature_flag_actions.get_current_state.invoke(()),

            SetLaunchPanelType { launch_panel_type } => a
                .launch_panel_state_actions
                .set_launch_panel_type
                .invoke(launch_panel_type),
            GetLaunchPanelState => a.launch_panel_state_actions.get_current_state.invoke(()),

            AddSelector(payload) => a.scoping_actions.add_selector.invoke(payload),
            DeleteSelector(payload) => a.scoping_actions.delete_selector.invoke(payload),
            GetScopingState => a.scoping_actions.get_current_state.invoke(()),

            SetTelemetryState { enable_telemetry } => a
                .user_configuration_actions
                .set_telemetry_state
                .invoke(enable_telemetry),
            SetHighContrastMode(payload) => a
                .user_configuration_actions
                .set_high_contrast_mode
                .invoke(payload),
            SetNativeHighContrastMode(payload) => a
                .user_configuration_actions
                .set_native_high_contrast_mode
                .invoke(payload),
            SetIssueFilingService(payload) => a
                .user_configuration_actions
                .set_issue_filing_service
                .invoke(payload),
            SetIssueFilingServiceProperty(payload) => a
                .user_configuration_actions
                .set_issue_filing_service_property
                .invoke(payload),
            SaveIssueFilingSettings(payload) => a
                .user_configuration_actions
                .save_issue_filing_settings
                .invoke(payload),
            SaveWindowBounds(payload) => a
                .user_configuration_actions
                .save_window_bounds
                .invoke(payload),
            SetAdbLocation { adb_location } => a
                .user_configuration_actions
                .set_adb_location
                .invoke(adb_location),
            SetAutoDetectedFailuresDialogState { enabled } => a
                .user_configuration_actions
                .set_auto_detected_failures_dialog_state
                .invoke(enabled),
            GetUserConfiguration => a.user_configuration_actions.get_current_state.invoke(()),

            SetPermissionsState {
                has_all_url_and_file_permissions,
            } => a
                .permissions_state_actions
                .set_permissions_state
                .invoke(has_all_url_and_file_permissions),
            GetPermissionsState => a.permissions_state_actions.get_current_state.invoke(()),

            other => {
                anyhow::bail!("{:?} is not a global message", other);
            }
        };

        result.context("Global action failed")
    }

    fn dispatch_tab(&self, tab_id: i64, message: ActionMessage) -> Result<()> {
        use ActionMessage::*;

        let context = self
            .tabs
            .get(&tab_id)
            .with_context(|| format!("No context for tab {}", tab_id))?;
        let tab_actions = &context.actions.tab_actions;
        let visualization = &context.actions.visualization_actions;
        let injection = &context.actions.injection_actions;

        let result = match message {
            NewTabCreated { tab, .. } => tab_actions.new_tab_created.invoke(tab),
            TabUpdate { tab, .. } => tab_actions.tab_update.invoke(tab),
            TabRemove { .. } => tab_actions.tab_remove.invoke(()),
            TabChange { tab, .. } => tab_actions.tab_change.invoke(tab),
            TabVisibilityChange { hidden, .. } => tab_actions.tab_visibility_change.invoke(hidden),
            ExistingTabUpdated { tab, .. } => tab_actions
                .tab_update
                .invoke(tab.clone())
                .and_then(|()| tab_actions.existing_tab_updated.invoke(tab)),
            GetTabState { .. } => tab_actions.get_current_state.invoke(()),

            EnableVisualization { toggle, .. } => visualization.enable_visualization.invoke(toggle),
            EnableVisualizationWithoutScan { toggle, .. } => visualization
                .enable_visualization_without_scan
                .invoke(toggle),
            DisableVisualization { test, .. } => visualization.disable_visualization.invoke(test),
            DisableAssessmentVisualizations { .. } => {
                visualization.disable_assessment_visualizations.invoke(())
            }
            ScanCompleted { .. } => visualization.scan_completed.invoke(()),
            UpdateFocusedInstance { target, .. } => {
                visualization.update_focused_instance.invoke(target)
            }
            ScrollRequested { .. } => visualization.scroll_requested.invoke(()),
            UpdateSelectedPivot { payload, .. } => visualization.update_selected_pivot.invoke(payload),
            UpdateSelectedPivotChild { payload, .. } => {
                visualization.update_selected_pivot_child.invoke(payload)
            }
            GetVisualizationState { .. } => visualization.get_current_state.invoke(()),

            InjectionStarted { .. } => injection.injection_started.invoke(()),
            InjectionCompleted { .. } => injection.injection_completed.invoke(()),
            InjectionFailed { .. } => injection.injection_failed.invoke(()),

            other => {
                anyhow::bail!("{:?} is not a tab message", other);
            }
        };

        result.with_context(|| format!("Action for tab {} failed", tab_id))
    }

    fn ensure_tab(&mut self, tab_id: i64, url: Option<String>) -> Result<()> {
        if !self.tabs.contains_key(&tab_id) {
            self.create_tab(tab_id)?;
        }

        let known = self.known_tab_ids.get(&tab_id);
        let url = url.or_else(|| known.cloned()).unwrap_or_default();
        if known != Some(&url) {
            self.known_tab_ids.insert(tab_id, url);
            self.persist_known_tabs();
        }
        Ok(())
    }

    fn create_tab(&mut self, tab_id: i64) -> Result<()> {
        let actions = TabContextActionHub::new();
        let hub = TabContextStoreHub::new(
            &actions,
            tab_id,
            self.persisted.tab(tab_id),
            Arc::clone(&self.backend),
            self.persist_store_data,
            Rc::clone(&self.notification_creator),
        );
        hub.initialize()
            .with_context(|| format!("Failed to initialize store hub for tab {}", tab_id))?;
        self.tracker.watch(&hub, Some(tab_id));

        log::info!("Created context for tab {}", tab_id);
        self.tabs.insert(tab_id, TabContext { actions, hub });
        Ok(())
    }

    fn remove_tab(&mut self, tab_id: i64) {
        if self.tabs.remove(&tab_id).is_some() {
            log::info!("Removed context for tab {}", tab_id);
            if self.persist_store_data {
                for key in [data_keys::tab_store(tab_id), data_keys::visualization_store(tab_id)] {
                    let removal = self.backend.remove_item(&key);
                    spawn_write(format!("{} (removal)", key), removal);
                }
            }
        }
        self.persisted.tab_data.remove(&tab_id);
        if self.known_tab_ids.remove(&tab_id).is_some() {
            self.persist_known_tabs();
        }
    }

    fn persist_known_tabs(&self) {
        if !self.persist_store_data {
            return;
        }

        let value = match serde_json::to_value(&self.known_tab_ids) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to serialize known tabs: {}", e);
                return;
            }
        };
        let write = self.backend.set_item(data_keys::KNOWN_TAB_IDS, value);
        spawn_write(data_keys::KNOWN_TAB_IDS, write);
    }

    fn collect_changes(&self) -> Result<Vec<StoreChange>> {
        self.tracker
            .take()
            .into_iter()
            .filter_map(|(tab_id, id)| {
                let store = match tab_id {
                    None => self.global_hub.store(id),
                    Some(tab_id) => self.tab_hub(tab_id).and_then(|hub| hub.store(id)),
                };
                store.map(|store| store_change(store, tab_id))
            })
            .collect()
    }
}

fn store_change(store: &dyn AnyStore, tab_id: Option<i64>) -> Result<StoreChange> {
    let state = store
        .state_json()
        .with_context(|| format!("Failed to read state of {}", store.store_id()))?;
    Ok(StoreChange {
        store: store.store_id(),
        tab_id,
        state,
    })
}
