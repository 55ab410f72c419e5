//! Concrete stores and the hubs that own them
//!
//! Every store keeps its state container behind an `Rc` so the handlers it
//! registers can hold a clone. Handlers are plain functions taking the
//! container and the payload; [`listen`] binds one to an action.

pub mod feature_flag_store;
pub mod global_store_hub;
pub mod launch_panel_store;
pub mod permissions_state_store;
pub mod scoping_store;
pub mod tab_context_store_hub;
pub mod tab_store;
pub mod user_configuration_store;
pub mod visualization_store;

use std::rc::Rc;

use insights_flux::{Action, FluxError, StoreNames};

pub use feature_flag_store::FeatureFlagStore;
pub use global_store_hub::GlobalStoreHub;
pub use launch_panel_store::LaunchPanelStore;
pub use permissions_state_store::PermissionsStateStore;
pub use scoping_store::ScopingStore;
pub use tab_context_store_hub::TabContextStoreHub;
pub use tab_store::TabStore;
pub use user_configuration_store::UserConfigurationStore;
pub use visualization_store::VisualizationStore;

/// Register `handler` for `action` on behalf of `owner`
pub(crate) fn listen<S, P>(
    action: &Action<P>,
    owner: StoreNames,
    target: &Rc<S>,
    handler: fn(&S, P) -> Result<(), FluxError>,
) -> Result<(), FluxError>
where
    S: 'static,
    P: 'static,
{
    let target = Rc::clone(target);
    action.add_listener(owner, move |payload| handler(&target, payload))
}
