use insights_flux::Action;

#[derive(Debug)]
pub struct PermissionsStateActions {
    /// Payload: whether the extension holds all-URL and file permissions
    pub set_permissions_state: Action<bool>,
    pub get_current_state: Action<()>,
}

impl Default for PermissionsStateActions {
    fn default() -> Self {
        Self {
            set_permissions_state: Action::new("setPermissionsState"),
            get_current_state: Action::new("getCurrentPermissionsState"),
        }
    }
}
