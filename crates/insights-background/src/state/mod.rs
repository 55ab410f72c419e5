//! Store data types
//!
//! One module per store. Every type here is plain data: `Clone`, comparable
//! and serialized in camelCase, which is the layout written to the backend.

pub mod feature_flags;
pub mod launch_panel;
pub mod permissions;
pub mod scoping;
pub mod tab;
pub mod user_configuration;
pub mod visualization;

pub use feature_flags::{FeatureFlagDetail, FeatureFlagStoreData, FEATURE_FLAGS};
pub use launch_panel::{LaunchPanelStoreData, LaunchPanelType};
pub use permissions::PermissionsStateStoreData;
pub use scoping::{ScopingInputType, ScopingStoreData, Selectors};
pub use tab::TabStoreData;
pub use user_configuration::{UserConfigurationStoreData, WindowBounds, WindowState};
pub use visualization::{
    AssessmentScanData, DetailsViewPivotType, ScanData, TestMode, VisualizationConfiguration,
    VisualizationStoreData, VisualizationType,
};
