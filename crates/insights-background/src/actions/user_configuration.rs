use insights_flux::Action;

use super::payloads::{
    SaveIssueFilingSettingsPayload, SaveWindowBoundsPayload, SetHighContrastModePayload,
    SetIssueFilingServicePayload, SetIssueFilingServicePropertyPayload,
};

#[derive(Debug)]
pub struct UserConfigurationActions {
    pub set_telemetry_state: Action<bool>,
    pub set_high_contrast_mode: Action<SetHighContrastModePayload>,
    /// The operating system entered or left high contrast mode
    pub set_native_high_contrast_mode: Action<SetHighContrastModePayload>,
    pub set_issue_filing_service: Action<SetIssueFilingServicePayload>,
    pub set_issue_filing_service_property: Action<SetIssueFilingServicePropertyPayload>,
    pub save_issue_filing_settings: Action<SaveIssueFilingSettingsPayload>,
    pub save_window_bounds: Action<SaveWindowBoundsPayload>,
    pub set_adb_location: Action<String>,
    pub set_auto_detected_failures_dialog_state: Action<bool>,
    pub get_current_state: Action<()>,
}

impl Default for UserConfigurationActions {
    fn default() -> Self {
        Self {
            set_telemetry_state: Action::new("setTelemetryState"),
            set_high_contrast_mode: Action::new("setHighContrastMode"),
            set_native_high_contrast_mode: Action::new("setNativeHighContrastMode"),
            set_issue_filing_service: Action::new("setIssueFilingService"),
            set_issue_filing_service_property: Action::new("setIssueFilingServiceProperty"),
            save_issue_filing_settings: Action::new("saveIssueFilingSettings"),
            save_window_bounds: Action::new("saveWindowBounds"),
            set_adb_location: Action::new("setAdbLocation"),
            set_auto_detected_failures_dialog_state: Action::new(
                "setAutoDetectedFailuresDialogState",
            ),
            get_current_state: Action::new("getCurrentUserConfigurationState"),
        }
    }
}
