//! Fixed enumeration of store identities

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Name of every store the background process can host
///
/// Used as the store id, as the owner tag on actions and as the key for
/// per-store entries in aggregate state bags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, IntoStaticStr,
    Serialize, Deserialize,
)]
pub enum StoreNames {
    FeatureFlagStore,
    LaunchPanelStateStore,
    ScopingStore,
    UserConfigurationStore,
    PermissionsStateStore,
    TabStore,
    VisualizationStore,
}
