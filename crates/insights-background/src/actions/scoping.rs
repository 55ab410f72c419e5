use insights_flux::Action;

use super::payloads::ScopingPayload;

#[derive(Debug)]
pub struct ScopingActions {
    pub add_selector: Action<ScopingPayload>,
    pub delete_selector: Action<ScopingPayload>,
    pub get_current_state: Action<()>,
}

impl Default for ScopingActions {
    fn default() -> Self {
        Self {
            add_selector: Action::new("addSelector"),
            delete_selector: Action::new("deleteSelector"),
            get_current_state: Action::new("getCurrentScopingState"),
        }
    }
}
