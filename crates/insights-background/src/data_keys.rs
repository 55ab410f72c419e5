//! Backend keys of persisted store snapshots

pub const FEATURE_FLAGS: &str = "featureFlags";
pub const USER_CONFIGURATION: &str = "userConfiguration";
pub const SCOPING_STORE: &str = "scopingStore";
pub const PERMISSIONS_STATE_STORE: &str = "permissionsStateStore";
/// Tab id → last known URL of every tab with a context
pub const KNOWN_TAB_IDS: &str = "knownTabIds";

pub fn tab_store(tab_id: i64) -> String {
    format!("tabStore-{}", tab_id)
}

pub fn visualization_store(tab_id: i64) -> String {
    format!("visualizationStore-{}", tab_id)
}
