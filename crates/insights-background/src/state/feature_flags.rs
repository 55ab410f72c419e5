//! Feature flag catalogue and store data

use std::collections::BTreeMap;

/// Flag name → enabled
pub type FeatureFlagStoreData = BTreeMap<String, bool>;

/// Static description of one feature flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlagDetail {
    pub id: &'static str,
    pub default_enabled: bool,
    /// Persisted values are ignored; the flag always starts at its default
    pub force_default: bool,
}

pub const FEATURE_FLAGS: &[FeatureFlagDetail] = &[
    FeatureFlagDetail {
        id: "logTelemetryToConsole",
        default_enabled: false,
        force_default: false,
    },
    FeatureFlagDetail {
        id: "showAllAssessments",
        default_enabled: false,
        force_default: false,
    },
    FeatureFlagDetail {
        id: "showInstanceVisibility",
        default_enabled: false,
        force_default: false,
    },
    FeatureFlagDetail {
        id: "manualInstanceDetails",
        default_enabled: false,
        force_default: false,
    },
    FeatureFlagDetail {
        id: "debugTools",
        default_enabled: false,
        force_default: true,
    },
    FeatureFlagDetail {
        id: "exportReportOptions",
        default_enabled: true,
        force_default: false,
    },
];

/// Every known flag at its default value
pub fn default_feature_flag_values() -> FeatureFlagStoreData {
    FEATURE_FLAGS
        .iter()
        .map(|flag| (flag.id.to_string(), flag.default_enabled))
        .collect()
}

/// Names of flags that always start at their default value
pub fn force_default_flags() -> Vec<&'static str> {
    FEATURE_FLAGS
        .iter()
        .filter(|flag| flag.force_default)
        .map(|flag| flag.id)
        .collect()
}
