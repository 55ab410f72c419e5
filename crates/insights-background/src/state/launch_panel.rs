use serde::{Deserialize, Serialize};
use strum::Display;

/// Panel shown when the extension popup opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchPanelType {
    #[default]
    LaunchPad,
    AdhocToolsPanel,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPanelStoreData {
    pub launch_panel_type: LaunchPanelType,
}
