//! Action payloads
//!
//! Payloads double as the body of inbound messages, so they deserialize from
//! camelCase JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{
    DetailsViewPivotType, ScopingInputType, VisualizationType, WindowBounds, WindowState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlagPayload {
    pub feature: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopingPayload {
    pub input_type: ScopingInputType,
    pub selector: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetHighContrastModePayload {
    pub enable_high_contrast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIssueFilingServicePayload {
    pub issue_filing_service_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIssueFilingServicePropertyPayload {
    pub issue_filing_service_name: String,
    pub property_name: String,
    pub property_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveIssueFilingSettingsPayload {
    pub issue_filing_service_name: String,
    pub issue_filing_settings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWindowBoundsPayload {
    pub window_state: WindowState,
    pub window_bounds: WindowBounds,
}

/// Details of a browser tab as reported by the browser
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleActionPayload {
    pub test: VisualizationType,
    /// Assessment requirement step, ignored for ad hoc tests
    #[serde(default)]
    pub requirement: Option<String>,
}

impl ToggleActionPayload {
    pub fn new(test: VisualizationType) -> Self {
        Self {
            test,
            requirement: None,
        }
    }

    pub fn with_requirement(test: VisualizationType, requirement: impl Into<String>) -> Self {
        Self {
            test,
            requirement: Some(requirement.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSelectedPivotPayload {
    pub pivot_key: DetailsViewPivotType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSelectedDetailsViewPayload {
    #[serde(default)]
    pub details_view_type: Option<VisualizationType>,
    pub pivot_type: DetailsViewPivotType,
}
