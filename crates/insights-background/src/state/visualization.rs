//! Visualization toggles and the per-test configuration table
//!
//! Ad hoc tests are single on/off toggles. Assessment tests are made of
//! requirement steps; each step can be visualized on its own, and the test is
//! enabled while any of its steps is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum VisualizationType {
    Headings,
    Landmarks,
    TabStops,
    Color,
    Issues,
    NeedsReview,
    HeadingsAssessment,
    LandmarksAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TestMode {
    Adhoc,
    Assessments,
}

/// Top-level tab of the details view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailsViewPivotType {
    #[default]
    FastPass,
    Assessment,
    QuickAssess,
}

/// How a visualization type maps onto the toggle data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizationConfiguration {
    pub test: VisualizationType,
    pub test_mode: TestMode,
    pub key: &'static str,
    pub steps: &'static [&'static str],
}

const HEADINGS_STEPS: &[&str] = &["headingFunction", "missingHeadings", "headingLevel"];
const LANDMARKS_STEPS: &[&str] = &["primaryContent", "landmarkRoles", "noRepeatingContent"];

impl VisualizationType {
    pub fn configuration(self) -> VisualizationConfiguration {
        let (test_mode, key, steps): (TestMode, &'static str, &'static [&'static str]) = match self
        {
            Self::Headings => (TestMode::Adhoc, "headings", &[]),
            Self::Landmarks => (TestMode::Adhoc, "landmarks", &[]),
            Self::TabStops => (TestMode::Adhoc, "tabStops", &[]),
            Self::Color => (TestMode::Adhoc, "color", &[]),
            Self::Issues => (TestMode::Adhoc, "issues", &[]),
            Self::NeedsReview => (TestMode::Adhoc, "needsReview", &[]),
            Self::HeadingsAssessment => (TestMode::Assessments, "headings", HEADINGS_STEPS),
            Self::LandmarksAssessment => (TestMode::Assessments, "landmarks", LANDMARKS_STEPS),
        };

        VisualizationConfiguration {
            test: self,
            test_mode,
            key,
            steps,
        }
    }
}

impl VisualizationConfiguration {
    pub fn is_adhoc(&self) -> bool {
        self.test_mode == TestMode::Adhoc
    }

    /// Identifier recorded in `scanning` while this test scans
    ///
    /// Assessment scans run per step and are identified as `<key>-<step>`.
    pub fn identifier(&self, step: Option<&str>) -> String {
        match (self.test_mode, step) {
            (TestMode::Assessments, Some(step)) => format!("{}-{}", self.key, step),
            _ => self.key.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanData {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentScanData {
    pub enabled: bool,
    #[serde(default)]
    pub step_status: BTreeMap<String, bool>,
}

impl AssessmentScanData {
    fn with_steps(steps: &[&str]) -> Self {
        Self {
            enabled: false,
            step_status: steps.iter().map(|s| (s.to_string(), false)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdhocTests {
    pub headings: ScanData,
    pub landmarks: ScanData,
    pub tab_stops: ScanData,
    pub color: ScanData,
    pub issues: ScanData,
    pub needs_review: ScanData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentTests {
    pub headings: AssessmentScanData,
    pub landmarks: AssessmentScanData,
}

impl Default for AssessmentTests {
    fn default() -> Self {
        Self {
            headings: AssessmentScanData::with_steps(HEADINGS_STEPS),
            landmarks: AssessmentScanData::with_steps(LANDMARKS_STEPS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationTests {
    pub adhoc: AdhocTests,
    pub assessments: AssessmentTests,
}

impl VisualizationTests {
    fn adhoc_mut(&mut self, test: VisualizationType) -> Option<&mut ScanData> {
        let data = match test {
            VisualizationType::Headings => &mut self.adhoc.headings,
            VisualizationType::Landmarks => &mut self.adhoc.landmarks,
            VisualizationType::TabStops => &mut self.adhoc.tab_stops,
            VisualizationType::Color => &mut self.adhoc.color,
            VisualizationType::Issues => &mut self.adhoc.issues,
            VisualizationType::NeedsReview => &mut self.adhoc.needs_review,
            _ => return None,
        };
        Some(data)
    }

    fn assessment_mut(&mut self, test: VisualizationType) -> Option<&mut AssessmentScanData> {
        match test {
            VisualizationType::HeadingsAssessment => Some(&mut self.assessments.headings),
            VisualizationType::LandmarksAssessment => Some(&mut self.assessments.landmarks),
            _ => None,
        }
    }

    pub fn is_enabled(&self, test: VisualizationType) -> bool {
        match test {
            VisualizationType::Headings => self.adhoc.headings.enabled,
            VisualizationType::Landmarks => self.adhoc.landmarks.enabled,
            VisualizationType::TabStops => self.adhoc.tab_stops.enabled,
            VisualizationType::Color => self.adhoc.color.enabled,
            VisualizationType::Issues => self.adhoc.issues.enabled,
            VisualizationType::NeedsReview => self.adhoc.needs_review.enabled,
            VisualizationType::HeadingsAssessment => self.assessments.headings.enabled,
            VisualizationType::LandmarksAssessment => self.assessments.landmarks.enabled,
        }
    }

    /// Turn `test` on, and for assessments also the given step
    pub fn enable(&mut self, test: VisualizationType, step: Option<&str>) {
        if let Some(data) = self.adhoc_mut(test) {
            data.enabled = true;
        } else if let Some(data) = self.assessment_mut(test) {
            data.enabled = true;
            if let Some(step) = step {
                data.step_status.insert(step.to_string(), true);
            }
        }
    }

    /// Turn `test` off; returns whether anything was on
    pub fn disable(&mut self, test: VisualizationType) -> bool {
        if let Some(data) = self.adhoc_mut(test) {
            return std::mem::take(&mut data.enabled);
        }

        let Some(data) = self.assessment_mut(test) else {
            return false;
        };
        if !data.enabled {
            return false;
        }
        data.enabled = false;
        data.step_status.values_mut().for_each(|on| *on = false);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualizationStoreData {
    pub tests: VisualizationTests,
    /// Identifier of the scan in progress
    pub scanning: Option<String>,
    pub selected_fast_pass_details_view: VisualizationType,
    pub selected_adhoc_details_view: VisualizationType,
    pub selected_details_view_pivot: DetailsViewPivotType,
    pub injecting_requested: bool,
    pub injecting_started: bool,
    pub injection_failed: bool,
    pub injection_attempts: u32,
    pub focused_target: Option<Vec<String>>,
}

impl Default for VisualizationStoreData {
    fn default() -> Self {
        Self {
            tests: VisualizationTests::default(),
            scanning: None,
            selected_fast_pass_details_view: VisualizationType::Issues,
            selected_adhoc_details_view: VisualizationType::Issues,
            selected_details_view_pivot: DetailsViewPivotType::FastPass,
            injecting_requested: false,
            injecting_started: false,
            injection_failed: false,
            injection_attempts: 0,
            focused_target: None,
        }
    }
}

impl VisualizationStoreData {
    /// Initial state for a tab, keeping toggles and selections from `persisted`
    ///
    /// Scan and injection progress belong to the previous process and start
    /// over.
    pub fn restored(persisted: Option<&Self>) -> Self {
        match persisted {
            Some(persisted) => Self {
                tests: persisted.tests.clone(),
                selected_fast_pass_details_view: persisted.selected_fast_pass_details_view,
                selected_adhoc_details_view: persisted.selected_adhoc_details_view,
                selected_details_view_pivot: persisted.selected_details_view_pivot,
                focused_target: persisted.focused_target.clone(),
                ..Self::default()
            },
            None => Self::default(),
        }
    }
}
