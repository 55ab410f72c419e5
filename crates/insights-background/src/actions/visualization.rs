use insights_flux::Action;

use super::payloads::{
    ToggleActionPayload, UpdateSelectedDetailsViewPayload, UpdateSelectedPivotPayload,
};
use crate::state::VisualizationType;

#[derive(Debug)]
pub struct VisualizationActions {
    pub enable_visualization: Action<ToggleActionPayload>,
    pub enable_visualization_without_scan: Action<ToggleActionPayload>,
    pub disable_visualization: Action<VisualizationType>,
    pub disable_assessment_visualizations: Action<()>,
    pub scan_completed: Action<()>,
    pub update_focused_instance: Action<Vec<String>>,
    pub scroll_requested: Action<()>,
    pub update_selected_pivot: Action<UpdateSelectedPivotPayload>,
    pub update_selected_pivot_child: Action<UpdateSelectedDetailsViewPayload>,
    pub get_current_state: Action<()>,
}

impl Default for VisualizationActions {
    fn default() -> Self {
        Self {
            enable_visualization: Action::new("enableVisualization"),
            enable_visualization_without_scan: Action::new("enableVisualizationWithoutScan"),
            disable_visualization: Action::new("disableVisualization"),
            disable_assessment_visualizations: Action::new("disableAssessmentVisualizations"),
            scan_completed: Action::new("scanCompleted"),
            update_focused_instance: Action::new("updateFocusedInstance"),
            scroll_requested: Action::new("scrollRequested"),
            update_selected_pivot: Action::new("updateSelectedPivot"),
            update_selected_pivot_child: Action::new("updateSelectedPivotChild"),
            get_current_state: Action::new("getCurrentVisualizationState"),
        }
    }
}
