use insights_flux::Action;

use crate::state::LaunchPanelType;

#[derive(Debug)]
pub struct LaunchPanelStateActions {
    pub set_launch_panel_type: Action<LaunchPanelType>,
    pub get_current_state: Action<()>,
}

impl Default for LaunchPanelStateActions {
    fn default() -> Self {
        Self {
            set_launch_panel_type: Action::new("setLaunchPanelType"),
            get_current_state: Action::new("getCurrentLaunchPanelState"),
        }
    }
}
