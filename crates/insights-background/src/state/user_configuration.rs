//! User preferences shared by every tab

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowState {
    Normal,
    Maximized,
    FullScreen,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Issue filing service name → property name → value
pub type BugServicePropertiesMap = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfigurationStoreData {
    pub is_first_time: bool,
    pub enable_telemetry: bool,
    pub enable_high_contrast: bool,
    /// High contrast choice made in the extension, restored when the OS
    /// leaves high contrast mode
    pub last_selected_high_contrast: bool,
    pub bug_service: String,
    pub bug_service_properties_map: BugServicePropertiesMap,
    pub adb_location: Option<String>,
    pub last_window_bounds: Option<WindowBounds>,
    pub last_window_state: Option<WindowState>,
    pub show_auto_detected_failures_dialog: bool,
}

impl Default for UserConfigurationStoreData {
    fn default() -> Self {
        Self {
            is_first_time: true,
            enable_telemetry: false,
            enable_high_contrast: false,
            last_selected_high_contrast: false,
            bug_service: "none".to_string(),
            bug_service_properties_map: BTreeMap::new(),
            adb_location: None,
            last_window_bounds: None,
            last_window_state: None,
            show_auto_detected_failures_dialog: true,
        }
    }
}
