//! Action hubs
//!
//! Actions are grouped by domain, one struct per domain with one field per
//! action. A hub bundles the domain structs that belong to one store hub:
//! [`GlobalActionHub`] for process-wide stores and [`TabContextActionHub`]
//! for the stores of one browser tab. Every field is an `Rc` so that the hub
//! and the single store handling an action can share it.

pub mod feature_flag;
pub mod injection;
pub mod launch_panel;
pub mod payloads;
pub mod permissions;
pub mod scoping;
pub mod tab;
pub mod user_configuration;
pub mod visualization;

use std::rc::Rc;

pub use feature_flag::FeatureFlagActions;
pub use injection::InjectionActions;
pub use launch_panel::LaunchPanelStateActions;
pub use permissions::PermissionsStateActions;
pub use scoping::ScopingActions;
pub use tab::TabActions;
pub use user_configuration::UserConfigurationActions;
pub use visualization::VisualizationActions;

/// Actions consumed by the global store hub
#[derive(Debug, Clone, Default)]
pub struct GlobalActionHub {
    pub feature_flag_actions: Rc<FeatureFlagActions>,
    pub launch_panel_state_actions: Rc<LaunchPanelStateActions>,
    pub scoping_actions: Rc<ScopingActions>,
    pub user_configuration_actions: Rc<UserConfigurationActions>,
    pub permissions_state_actions: Rc<PermissionsStateActions>,
}

impl GlobalActionHub {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Actions consumed by one tab's store hub
#[derive(Debug, Clone, Default)]
pub struct TabContextActionHub {
    pub tab_actions: Rc<TabActions>,
    pub visualization_actions: Rc<VisualizationActions>,
    pub injection_actions: Rc<InjectionActions>,
}

impl TabContextActionHub {
    pub fn new() -> Self {
        Self::default()
    }
}
