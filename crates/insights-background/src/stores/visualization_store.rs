//! Visualization toggles of one tab, persisted under `visualizationStore-<tab>`
//!
//! Only one scan runs at a time: while `scanning` is set, enabling or
//! disabling toggles leaves the state untouched. Turning on any visualization
//! first turns off every assessment visualization, and switching the details
//! view pivot turns off everything.

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{
    BaseStore, FluxError, KeyValueStore, PersistentStore, StateHolder, Store, StoreNames,
};
use strum::IntoEnumIterator;

use super::listen;
use crate::actions::payloads::{
    TabPayload, ToggleActionPayload, UpdateSelectedDetailsViewPayload, UpdateSelectedPivotPayload,
};
use crate::actions::{InjectionActions, TabActions, VisualizationActions};
use crate::data_keys;
use crate::notification::{NotificationCreator, INJECTION_FAILED_MESSAGE};
use crate::state::{DetailsViewPivotType, VisualizationStoreData, VisualizationType};

/// Injection attempts before giving up on a page
pub const MAX_INJECTION_ATTEMPTS: u32 = 3;

/// State container plus the collaborators handlers need
struct VisualizationContext {
    store: PersistentStore<VisualizationStoreData>,
    notification_creator: Rc<dyn NotificationCreator>,
}

pub struct VisualizationStore {
    context: Rc<VisualizationContext>,
    visualization_actions: Rc<VisualizationActions>,
    tab_actions: Rc<TabActions>,
    injection_actions: Rc<InjectionActions>,
}

impl VisualizationStore {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        visualization_actions: Rc<VisualizationActions>,
        tab_actions: Rc<TabActions>,
        injection_actions: Rc<InjectionActions>,
        persisted: Option<VisualizationStoreData>,
        backend: Arc<dyn KeyValueStore>,
        tab_id: i64,
        persist_store_data: bool,
        notification_creator: Rc<dyn NotificationCreator>,
    ) -> Self {
        Self {
            context: Rc::new(VisualizationContext {
                store: PersistentStore::new(
                    StoreNames::VisualizationStore,
                    persisted,
                    backend,
                    data_keys::visualization_store(tab_id),
                    persist_store_data,
                ),
                notification_creator,
            }),
            visualization_actions,
            tab_actions,
            injection_actions,
        }
    }
}

impl Store for VisualizationStore {
    type State = VisualizationStoreData;

    fn base(&self) -> &BaseStore<VisualizationStoreData> {
        self.context.store.base()
    }

    fn default_state(&self) -> VisualizationStoreData {
        VisualizationStoreData::restored(self.context.store.persisted_state())
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        let ctx = &self.context;
        let visualization = &self.visualization_actions;

        listen(&visualization.enable_visualization, id, ctx, on_enable_visualization)?;
        listen(
            &visualization.enable_visualization_without_scan,
            id,
            ctx,
            on_enable_visualization_without_scan,
        )?;
        listen(&visualization.disable_visualization, id, ctx, on_disable_visualization)?;
        listen(
            &visualization.disable_assessment_visualizations,
            id,
            ctx,
            on_disable_assessment_visualizations,
        )?;
        listen(&visualization.scan_completed, id, ctx, on_scan_completed)?;
        listen(&visualization.update_focused_instance, id, ctx, on_update_focused_instance)?;
        listen(&visualization.scroll_requested, id, ctx, on_scroll_requested)?;
        listen(&visualization.get_current_state, id, ctx, on_get_current_state)?;
        listen(&visualization.update_selected_pivot_child, id, ctx, on_update_selected_pivot_child)?;
        listen(&visualization.update_selected_pivot, id, ctx, on_update_selected_pivot)?;

        listen(&self.tab_actions.existing_tab_updated, id, ctx, on_existing_tab_updated)?;

        listen(&self.injection_actions.injection_completed, id, ctx, on_injection_completed)?;
        listen(&self.injection_actions.injection_started, id, ctx, on_injection_started)?;
        listen(&self.injection_actions.injection_failed, id, ctx, on_injection_failed)
    }
}

/// Turn one test off unless a scan is running; returns whether it was on
fn toggle_test_off(state: &mut VisualizationStoreData, test: VisualizationType) -> bool {
    if state.scanning.is_some() {
        return false;
    }
    state.tests.disable(test)
}

fn disable_assessment_visualizations(state: &mut VisualizationStoreData) -> bool {
    VisualizationType::iter()
        .filter(|test| !test.configuration().is_adhoc())
        .fold(false, |changed, test| toggle_test_off(state, test) || changed)
}

fn disable_all_tests(state: &mut VisualizationStoreData) {
    for test in VisualizationType::iter() {
        toggle_test_off(state, test);
    }
}

fn enable_test(
    ctx: &VisualizationContext,
    payload: ToggleActionPayload,
    skip_scanning: bool,
) -> Result<(), FluxError> {
    let changed = ctx.store.update_and_emit(|state| {
        if state.scanning.is_some() {
            return;
        }

        let configuration = payload.test.configuration();
        let step = payload.requirement.as_deref();
        disable_assessment_visualizations(state);
        if !skip_scanning {
            state.scanning = Some(configuration.identifier(step));
        }
        state.injecting_requested = true;
        state.tests.enable(payload.test, step);
    })?;

    if changed {
        log::debug!("Enabled visualization {}", payload.test);
    } else {
        log::debug!("Visualization {} left unchanged", payload.test);
    }
    Ok(())
}

fn on_enable_visualization(
    ctx: &VisualizationContext,
    payload: ToggleActionPayload,
) -> Result<(), FluxError> {
    enable_test(ctx, payload, false)
}

fn on_enable_visualization_without_scan(
    ctx: &VisualizationContext,
    payload: ToggleActionPayload,
) -> Result<(), FluxError> {
    enable_test(ctx, payload, true)
}

fn on_disable_visualization(
    ctx: &VisualizationContext,
    test: VisualizationType,
) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| {
        toggle_test_off(state, test);
    })?;
    Ok(())
}

fn on_disable_assessment_visualizations(
    ctx: &VisualizationContext,
    _: (),
) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| {
        disable_assessment_visualizations(state);
    })?;
    Ok(())
}

fn on_scan_completed(ctx: &VisualizationContext, _: ()) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| state.scanning = None)?;
    Ok(())
}

fn on_update_focused_instance(
    ctx: &VisualizationContext,
    target: Vec<String>,
) -> Result<(), FluxError> {
    ctx.store
        .update_and_emit(|state| state.focused_target = Some(target))?;
    Ok(())
}

fn on_scroll_requested(ctx: &VisualizationContext, _: ()) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| state.focused_target = None)?;
    Ok(())
}

fn on_get_current_state(ctx: &VisualizationContext, _: ()) -> Result<(), FluxError> {
    ctx.store.emit_changed();
    Ok(())
}

fn on_update_selected_pivot(
    ctx: &VisualizationContext,
    payload: UpdateSelectedPivotPayload,
) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| {
        if state.selected_details_view_pivot != payload.pivot_key {
            state.selected_details_view_pivot = payload.pivot_key;
            disable_all_tests(state);
        }
    })?;
    Ok(())
}

fn on_update_selected_pivot_child(
    ctx: &VisualizationContext,
    payload: UpdateSelectedDetailsViewPayload,
) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| {
        let mut updated = false;

        if let Some(view) = payload.details_view_type {
            if payload.pivot_type == DetailsViewPivotType::FastPass
                && state.selected_fast_pass_details_view != view
            {
                state.selected_fast_pass_details_view = view;
                updated = true;
            }
        }

        if state.selected_details_view_pivot != payload.pivot_type {
            state.selected_details_view_pivot = payload.pivot_type;
            updated = true;
        }

        if updated {
            disable_all_tests(state);
        }
    })?;
    Ok(())
}

/// The tab now shows another page: start over, keeping the selected views
fn on_existing_tab_updated(ctx: &VisualizationContext, _: TabPayload) -> Result<(), FluxError> {
    let fresh = VisualizationStoreData::restored(ctx.store.persisted_state());
    ctx.store.update_and_emit(|state| {
        *state = VisualizationStoreData {
            selected_fast_pass_details_view: state.selected_fast_pass_details_view,
            selected_adhoc_details_view: state.selected_adhoc_details_view,
            selected_details_view_pivot: state.selected_details_view_pivot,
            ..fresh
        };
    })?;
    Ok(())
}

fn on_injection_started(ctx: &VisualizationContext, _: ()) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| {
        if !state.injecting_started {
            state.injecting_requested = true;
            state.injecting_started = true;
        }
    })?;
    Ok(())
}

fn on_injection_completed(ctx: &VisualizationContext, _: ()) -> Result<(), FluxError> {
    ctx.store.update_and_emit(|state| {
        state.injecting_requested = false;
        state.injecting_started = false;
    })?;
    Ok(())
}

fn on_injection_failed(ctx: &VisualizationContext, _: ()) -> Result<(), FluxError> {
    let gave_up = ctx.store.update(|state| {
        state.injection_attempts += 1;
        if state.injection_attempts < MAX_INJECTION_ATTEMPTS {
            state.injecting_requested = true;
            state.injecting_started = false;
            false
        } else {
            state.injection_failed = true;
            true
        }
    })?;

    if gave_up {
        log::warn!(
            "Injection failed {} times, giving up",
            MAX_INJECTION_ATTEMPTS
        );
        ctx.notification_creator
            .create_notification(INJECTION_FAILED_MESSAGE);
    }
    ctx.store.emit_changed();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::RecordingNotificationCreator;
    use crate::state::TestMode;
    use insights_flux::testing::{ListenerProbe, RecordingKeyValueStore};

    struct Fixture {
        store: VisualizationStore,
        actions: Rc<VisualizationActions>,
        tab_actions: Rc<TabActions>,
        injection_actions: Rc<InjectionActions>,
        backend: RecordingKeyValueStore,
        notifications: RecordingNotificationCreator,
        probe: ListenerProbe,
    }

    fn fixture_with(
        persisted: Option<VisualizationStoreData>,
        initial: Option<VisualizationStoreData>,
    ) -> Fixture {
        let actions = Rc::new(VisualizationActions::default());
        let tab_actions = Rc::new(TabActions::default());
        let injection_actions = Rc::new(InjectionActions::default());
        let backend = RecordingKeyValueStore::new();
        let notifications = RecordingNotificationCreator::new();

        let store = VisualizationStore::new(
            Rc::clone(&actions),
            Rc::clone(&tab_actions),
            Rc::clone(&injection_actions),
            persisted,
            Arc::new(backend.clone()),
            1,
            true,
            Rc::new(notifications.clone()),
        );
        store.initialize(initial).unwrap();
        let probe = ListenerProbe::attach(&store);

        Fixture {
            store,
            actions,
            tab_actions,
            injection_actions,
            backend,
            notifications,
            probe,
        }
    }

    fn fixture(initial: VisualizationStoreData) -> Fixture {
        fixture_with(None, Some(initial))
    }

    fn with_enabled(tests: &[(VisualizationType, Option<&str>)]) -> VisualizationStoreData {
        let mut state = VisualizationStoreData::default();
        for (test, step) in tests {
            state.tests.enable(*test, *step);
        }
        state
    }

    #[test]
    fn test_id_and_default_state() {
        let f = fixture_with(None, None);
        assert_eq!(f.store.id(), StoreNames::VisualizationStore);
        assert_eq!(f.store.state().unwrap(), VisualizationStoreData::default());
        assert_eq!(
            f.store.state().unwrap().selected_details_view_pivot,
            DetailsViewPivotType::FastPass
        );
    }

    #[test]
    fn test_enable_while_scanning_is_ignored() {
        let initial = VisualizationStoreData {
            scanning: Some("headings".to_string()),
            ..VisualizationStoreData::default()
        };
        let f = fixture(initial.clone());

        f.actions
            .enable_visualization
            .invoke(ToggleActionPayload::new(VisualizationType::Issues))
            .unwrap();

        assert_eq!(f.store.state().unwrap(), initial);
        assert_eq!(f.probe.count(), 0);
        assert!(f.backend.writes().is_empty());
    }

    #[test]
    fn test_enable_issues_starts_scan() {
        let f = fixture(VisualizationStoreData::default());

        f.actions
            .enable_visualization
            .invoke(ToggleActionPayload::new(VisualizationType::Issues))
            .unwrap();

        let state = f.store.state().unwrap();
        assert!(state.tests.adhoc.issues.enabled);
        assert_eq!(state.scanning.as_deref(), Some("issues"));
        assert_eq!(
            state.selected_details_view_pivot,
            DetailsViewPivotType::FastPass
        );
        assert!(state.injecting_requested);
        assert_eq!(f.probe.count(), 1);
        assert_eq!(f.backend.writes_for("visualizationStore-1").len(), 1);
    }

    #[test]
    fn test_enable_without_scan_leaves_scanning_unset() {
        let f = fixture(VisualizationStoreData::default());

        f.actions
            .enable_visualization_without_scan
            .invoke(ToggleActionPayload::new(VisualizationType::Color))
            .unwrap();

        let state = f.store.state().unwrap();
        assert!(state.tests.adhoc.color.enabled);
        assert_eq!(state.scanning, None);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_enable_assessment_step() {
        let f = fixture(with_enabled(&[(
            VisualizationType::LandmarksAssessment,
            Some("primaryContent"),
        )]));

        f.actions
            .enable_visualization
            .invoke(ToggleActionPayload::with_requirement(
                VisualizationType::HeadingsAssessment,
                "headingLevel",
            ))
            .unwrap();

        let state = f.store.state().unwrap();
        assert_eq!(state.scanning.as_deref(), Some("headings-headingLevel"));
        assert!(state.tests.assessments.headings.enabled);
        assert_eq!(
            state.tests.assessments.headings.step_status.get("headingLevel"),
            Some(&true)
        );
        // Other assessment visualizations are turned off first
        assert!(!state.tests.assessments.landmarks.enabled);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_enable_keeps_other_adhoc_tests() {
        let f = fixture(with_enabled(&[(VisualizationType::Headings, None)]));

        f.actions
            .enable_visualization
            .invoke(ToggleActionPayload::new(VisualizationType::Landmarks))
            .unwrap();

        let state = f.store.state().unwrap();
        assert!(state.tests.adhoc.headings.enabled);
        assert!(state.tests.adhoc.landmarks.enabled);
    }

    #[test]
    fn test_disable_visualization() {
        let f = fixture(with_enabled(&[(VisualizationType::Color, None)]));

        f.actions
            .disable_visualization
            .invoke(VisualizationType::Color)
            .unwrap();

        assert!(!f.store.state().unwrap().tests.adhoc.color.enabled);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_disable_already_disabled_is_silent() {
        let f = fixture(VisualizationStoreData::default());

        for test in VisualizationType::iter() {
            f.actions.disable_visualization.invoke(test).unwrap();
        }

        assert_eq!(f.probe.count(), 0);
        assert!(f.backend.writes().is_empty());
    }

    #[test]
    fn test_disable_while_scanning_is_ignored() {
        let mut initial = with_enabled(&[(VisualizationType::Color, None)]);
        initial.scanning = Some("color".to_string());
        let f = fixture(initial);

        f.actions
            .disable_visualization
            .invoke(VisualizationType::Color)
            .unwrap();

        assert!(f.store.state().unwrap().tests.adhoc.color.enabled);
        assert_eq!(f.probe.count(), 0);
    }

    #[test]
    fn test_disable_assessment_visualizations_keeps_adhoc() {
        let f = fixture(with_enabled(&[
            (VisualizationType::Issues, None),
            (VisualizationType::HeadingsAssessment, Some("missingHeadings")),
        ]));

        f.actions
            .disable_assessment_visualizations
            .invoke(())
            .unwrap();

        let state = f.store.state().unwrap();
        assert!(state.tests.adhoc.issues.enabled);
        assert!(!state.tests.assessments.headings.enabled);
        for test in VisualizationType::iter() {
            if test.configuration().test_mode == TestMode::Assessments {
                assert!(!state.tests.is_enabled(test));
            }
        }
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_scan_completed() {
        let f = fixture(VisualizationStoreData {
            scanning: Some("issues".to_string()),
            ..VisualizationStoreData::default()
        });

        f.actions.scan_completed.invoke(()).unwrap();

        assert_eq!(f.store.state().unwrap().scanning, None);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_focus_and_scroll() {
        let f = fixture(VisualizationStoreData::default());
        let target = vec!["iframe".to_string(), "#id".to_string()];

        f.actions
            .update_focused_instance
            .invoke(target.clone())
            .unwrap();
        assert_eq!(f.store.state().unwrap().focused_target, Some(target));

        f.actions.scroll_requested.invoke(()).unwrap();
        assert_eq!(f.store.state().unwrap().focused_target, None);
        assert_eq!(f.probe.count(), 2);
    }

    #[test]
    fn test_update_selected_pivot_disables_all_tests() {
        let f = fixture(with_enabled(&[
            (VisualizationType::Issues, None),
            (VisualizationType::TabStops, None),
        ]));

        f.actions
            .update_selected_pivot
            .invoke(UpdateSelectedPivotPayload {
                pivot_key: DetailsViewPivotType::Assessment,
            })
            .unwrap();

        let state = f.store.state().unwrap();
        assert_eq!(
            state.selected_details_view_pivot,
            DetailsViewPivotType::Assessment
        );
        assert!(VisualizationType::iter().all(|test| !state.tests.is_enabled(test)));
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_update_selected_pivot_to_current_is_silent() {
        let f = fixture(with_enabled(&[(VisualizationType::Issues, None)]));

        f.actions
            .update_selected_pivot
            .invoke(UpdateSelectedPivotPayload {
                pivot_key: DetailsViewPivotType::FastPass,
            })
            .unwrap();

        assert!(f.store.state().unwrap().tests.adhoc.issues.enabled);
        assert_eq!(f.probe.count(), 0);
    }

    #[test]
    fn test_update_selected_pivot_child() {
        let f = fixture(with_enabled(&[(VisualizationType::Issues, None)]));

        f.actions
            .update_selected_pivot_child
            .invoke(UpdateSelectedDetailsViewPayload {
                details_view_type: Some(VisualizationType::NeedsReview),
                pivot_type: DetailsViewPivotType::FastPass,
            })
            .unwrap();

        let state = f.store.state().unwrap();
        assert_eq!(
            state.selected_fast_pass_details_view,
            VisualizationType::NeedsReview
        );
        assert!(!state.tests.adhoc.issues.enabled);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_update_selected_pivot_child_without_change_is_silent() {
        let f = fixture(VisualizationStoreData::default());

        f.actions
            .update_selected_pivot_child
            .invoke(UpdateSelectedDetailsViewPayload {
                details_view_type: None,
                pivot_type: DetailsViewPivotType::FastPass,
            })
            .unwrap();

        assert_eq!(f.probe.count(), 0);
    }

    #[test]
    fn test_existing_tab_updated_resets_but_keeps_selection() {
        let mut initial = with_enabled(&[(VisualizationType::Issues, None)]);
        initial.scanning = Some("issues".to_string());
        initial.selected_details_view_pivot = DetailsViewPivotType::QuickAssess;
        initial.selected_adhoc_details_view = VisualizationType::Landmarks;
        let f = fixture(initial);

        f.tab_actions
            .existing_tab_updated
            .invoke(TabPayload::default())
            .unwrap();

        let expected = VisualizationStoreData {
            selected_details_view_pivot: DetailsViewPivotType::QuickAssess,
            selected_adhoc_details_view: VisualizationType::Landmarks,
            ..VisualizationStoreData::default()
        };
        assert_eq!(f.store.state().unwrap(), expected);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_injection_started_then_completed() {
        let f = fixture(VisualizationStoreData::default());

        f.injection_actions.injection_started.invoke(()).unwrap();
        let state = f.store.state().unwrap();
        assert!(state.injecting_requested);
        assert!(state.injecting_started);

        // Already started
        f.injection_actions.injection_started.invoke(()).unwrap();
        assert_eq!(f.probe.count(), 1);

        f.injection_actions.injection_completed.invoke(()).unwrap();
        let state = f.store.state().unwrap();
        assert!(!state.injecting_requested);
        assert!(!state.injecting_started);
        assert_eq!(f.probe.count(), 2);
    }

    #[test]
    fn test_injection_failed_retries_then_notifies() {
        let f = fixture(VisualizationStoreData {
            injecting_started: true,
            ..VisualizationStoreData::default()
        });

        f.injection_actions.injection_failed.invoke(()).unwrap();
        let state = f.store.state().unwrap();
        assert_eq!(state.injection_attempts, 1);
        assert!(state.injecting_requested);
        assert!(!state.injecting_started);
        assert!(!state.injection_failed);

        f.injection_actions.injection_failed.invoke(()).unwrap();
        assert!(f.notifications.messages().is_empty());

        f.injection_actions.injection_failed.invoke(()).unwrap();
        let state = f.store.state().unwrap();
        assert_eq!(state.injection_attempts, MAX_INJECTION_ATTEMPTS);
        assert!(state.injection_failed);
        assert_eq!(
            f.notifications.messages(),
            vec![INJECTION_FAILED_MESSAGE.to_string()]
        );
        assert_eq!(f.probe.count(), 3);
    }

    #[test]
    fn test_default_state_restores_persisted_toggles() {
        let mut persisted = with_enabled(&[(VisualizationType::Headings, None)]);
        persisted.scanning = Some("headings".to_string());
        let f = fixture_with(Some(persisted), None);

        let state = f.store.state().unwrap();
        assert!(state.tests.adhoc.headings.enabled);
        assert_eq!(state.scanning, None);
        assert_eq!(f.store.default_state(), f.store.default_state());
    }

    #[test]
    fn test_two_changes_write_two_snapshots() {
        let f = fixture(VisualizationStoreData::default());

        f.actions
            .enable_visualization
            .invoke(ToggleActionPayload::new(VisualizationType::Issues))
            .unwrap();
        f.actions.scan_completed.invoke(()).unwrap();

        let writes = f.backend.writes_for("visualizationStore-1");
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0]["scanning"], serde_json::json!("issues"));
        assert_eq!(writes[1]["scanning"], serde_json::json!(null));
    }
}
