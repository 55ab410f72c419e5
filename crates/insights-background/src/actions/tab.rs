use insights_flux::Action;

use super::payloads::TabPayload;

#[derive(Debug)]
pub struct TabActions {
    pub new_tab_created: Action<TabPayload>,
    pub tab_update: Action<TabPayload>,
    pub tab_remove: Action<()>,
    pub tab_change: Action<TabPayload>,
    /// Payload: whether the page is now hidden
    pub tab_visibility_change: Action<bool>,
    /// The tab was reused for a different page
    pub existing_tab_updated: Action<TabPayload>,
    pub get_current_state: Action<()>,
}

impl Default for TabActions {
    fn default() -> Self {
        Self {
            new_tab_created: Action::new("newTabCreated"),
            tab_update: Action::new("tabUpdate"),
            tab_remove: Action::new("tabRemove"),
            tab_change: Action::new("tabChange"),
            tab_visibility_change: Action::new("tabVisibilityChange"),
            existing_tab_updated: Action::new("existingTabUpdated"),
            get_current_state: Action::new("getCurrentTabState"),
        }
    }
}
