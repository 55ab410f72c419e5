use insights_flux::Action;

use super::payloads::FeatureFlagPayload;

#[derive(Debug)]
pub struct FeatureFlagActions {
    pub set_feature_flag: Action<FeatureFlagPayload>,
    pub reset_feature_flags: Action<()>,
    pub get_current_state: Action<()>,
}

impl Default for FeatureFlagActions {
    fn default() -> Self {
        Self {
            set_feature_flag: Action::new("setFeatureFlag"),
            reset_feature_flags: Action::new("resetFeatureFlags"),
            get_current_state: Action::new("getCurrentFeatureFlagState"),
        }
    }
}
