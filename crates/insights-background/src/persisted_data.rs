//! Restoring store snapshots at startup
//!
//! Everything is read before any store is built, so stores only ever see a
//! plain `Option<State>` for their persisted input. A record that cannot be
//! read or decoded is logged and treated as absent; one corrupt snapshot never
//! keeps the process from starting.

use std::collections::BTreeMap;

use insights_flux::KeyValueStore;
use serde::de::DeserializeOwned;

use crate::data_keys;
use crate::state::{
    FeatureFlagStoreData, PermissionsStateStoreData, ScopingStoreData, TabStoreData,
    UserConfigurationStoreData, VisualizationStoreData,
};

/// Tab id → last known URL
pub type KnownTabIds = BTreeMap<i64, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabPersistedData {
    pub tab_store: Option<TabStoreData>,
    pub visualization_store: Option<VisualizationStoreData>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedData {
    pub feature_flags: Option<FeatureFlagStoreData>,
    pub user_configuration: Option<UserConfigurationStoreData>,
    pub scoping: Option<ScopingStoreData>,
    pub permissions_state: Option<PermissionsStateStoreData>,
    pub known_tab_ids: KnownTabIds,
    pub tab_data: BTreeMap<i64, TabPersistedData>,
}

impl PersistedData {
    /// Snapshots for `tab_id`, empty when the tab was never persisted
    pub fn tab(&self, tab_id: i64) -> TabPersistedData {
        self.tab_data.get(&tab_id).cloned().unwrap_or_default()
    }
}

/// Read one record, logging and discarding anything unusable
async fn read_record<T: DeserializeOwned>(backend: &dyn KeyValueStore, key: &str) -> Option<T> {
    let value = match backend.get_item(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read persisted '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(data) => {
            log::debug!("Restored persisted '{}'", key);
            Some(data)
        }
        Err(e) => {
            log::warn!("Ignoring corrupt persisted '{}': {}", key, e);
            None
        }
    }
}

/// Read the global records, then the records of every known tab
///
/// With `ignore_persisted_data` nothing is read and every store starts from
/// its defaults.
pub async fn load_all_persisted_data(
    backend: &dyn KeyValueStore,
    ignore_persisted_data: bool,
) -> PersistedData {
    if ignore_persisted_data {
        log::info!("Ignoring persisted data");
        return PersistedData::default();
    }

    let (feature_flags, user_configuration, scoping, permissions_state, known_tab_ids) = tokio::join!(
        read_record(backend, data_keys::FEATURE_FLAGS),
        read_record(backend, data_keys::USER_CONFIGURATION),
        read_record(backend, data_keys::SCOPING_STORE),
        read_record(backend, data_keys::PERMISSIONS_STATE_STORE),
        read_record::<KnownTabIds>(backend, data_keys::KNOWN_TAB_IDS),
    );
    let known_tab_ids = known_tab_ids.unwrap_or_default();

    let mut tab_data = BTreeMap::new();
    for &tab_id in known_tab_ids.keys() {
        let tab_key = data_keys::tab_store(tab_id);
        let visualization_key = data_keys::visualization_store(tab_id);
        let (tab_store, visualization_store) = tokio::join!(
            read_record(backend, &tab_key),
            read_record(backend, &visualization_key),
        );
        tab_data.insert(
            tab_id,
            TabPersistedData {
                tab_store,
                visualization_store,
            },
        );
    }

    log::info!(
        "Loaded persisted data for {} known tab(s)",
        known_tab_ids.len()
    );

    PersistedData {
        feature_flags,
        user_configuration,
        scoping,
        permissions_state,
        known_tab_ids,
        tab_data,
    }
}
