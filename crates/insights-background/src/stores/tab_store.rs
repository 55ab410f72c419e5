//! The browser tab a tab context is bound to, persisted under `tabStore-<tab>`

use std::rc::Rc;
use std::sync::Arc;

use insights_flux::{
    BaseStore, FluxError, KeyValueStore, PersistentStore, StateHolder, Store, StoreNames,
};

use super::listen;
use crate::actions::payloads::TabPayload;
use crate::actions::TabActions;
use crate::data_keys;
use crate::state::TabStoreData;

type Container = PersistentStore<TabStoreData>;

pub struct TabStore {
    store: Rc<Container>,
    actions: Rc<TabActions>,
}

impl TabStore {
    pub fn new(
        actions: Rc<TabActions>,
        persisted: Option<TabStoreData>,
        backend: Arc<dyn KeyValueStore>,
        tab_id: i64,
        persist_store_data: bool,
    ) -> Self {
        Self {
            store: Rc::new(PersistentStore::new(
                StoreNames::TabStore,
                persisted,
                backend,
                data_keys::tab_store(tab_id),
                persist_store_data,
            )),
            actions,
        }
    }
}

impl Store for TabStore {
    type State = TabStoreData;

    fn base(&self) -> &BaseStore<TabStoreData> {
        self.store.base()
    }

    fn default_state(&self) -> TabStoreData {
        self.store.persisted_state().cloned().unwrap_or_default()
    }

    fn add_action_listeners(&self) -> Result<(), FluxError> {
        let id = self.id();
        listen(&self.actions.get_current_state, id, &self.store, on_get_current_state)?;
        listen(&self.actions.new_tab_created, id, &self.store, on_tab_update)?;
        listen(&self.actions.tab_update, id, &self.store, on_tab_update)?;
        listen(&self.actions.tab_remove, id, &self.store, on_tab_remove)?;
        listen(&self.actions.tab_change, id, &self.store, on_tab_change)?;
        listen(&self.actions.tab_visibility_change, id, &self.store, on_visibility_change)
    }
}

fn on_get_current_state(store: &Container, _: ()) -> Result<(), FluxError> {
    store.emit_changed();
    Ok(())
}

/// The tab now shows a freshly loaded page
///
/// Fields missing from the payload keep their previous value.
fn on_tab_update(store: &Container, tab: TabPayload) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.id = tab.id.or(state.id);
        state.url = tab.url.or(state.url.take());
        state.title = tab.title.or(state.title.take());
        state.is_closed = false;
        state.is_changed = false;
    })?;
    Ok(())
}

fn on_tab_remove(store: &Container, _: ()) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.is_closed = true)?;
    Ok(())
}

/// The tab navigated away from the scanned page
fn on_tab_change(store: &Container, tab: TabPayload) -> Result<(), FluxError> {
    store.update_and_emit(|state| {
        state.url = tab.url.or(state.url.take());
        state.title = tab.title.or(state.title.take());
        state.is_changed = true;
    })?;
    Ok(())
}

fn on_visibility_change(store: &Container, hidden: bool) -> Result<(), FluxError> {
    store.update_and_emit(|state| state.is_page_hidden = hidden)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_flux::testing::{ListenerProbe, RecordingKeyValueStore};
    use serde_json::json;

    struct Fixture {
        store: TabStore,
        actions: Rc<TabActions>,
        backend: RecordingKeyValueStore,
        probe: ListenerProbe,
    }

    fn fixture(initial: TabStoreData) -> Fixture {
        let actions = Rc::new(TabActions::default());
        let backend = RecordingKeyValueStore::new();
        let store = TabStore::new(Rc::clone(&actions), None, Arc::new(backend.clone()), 5, true);
        store.initialize(Some(initial)).unwrap();
        let probe = ListenerProbe::attach(&store);
        Fixture {
            store,
            actions,
            backend,
            probe,
        }
    }

    fn tab(url: &str, title: &str) -> TabPayload {
        TabPayload {
            id: None,
            url: Some(url.to_string()),
            title: Some(title.to_string()),
        }
    }

    #[test]
    fn test_tab_update() {
        let f = fixture(TabStoreData::default());
        f.actions
            .tab_update
            .invoke(TabPayload {
                id: Some(-1),
                ..tab("test-url", "test-title")
            })
            .unwrap();

        assert_eq!(
            f.store.state().unwrap(),
            TabStoreData {
                id: Some(-1),
                url: Some("test-url".to_string()),
                title: Some("test-title".to_string()),
                ..TabStoreData::default()
            }
        );
        assert_eq!(f.probe.count(), 1);
        assert_eq!(f.backend.writes_for("tabStore-5")[0]["id"], json!(-1));
    }

    #[test]
    fn test_new_tab_created_keeps_known_id() {
        let f = fixture(TabStoreData {
            id: Some(5),
            ..TabStoreData::default()
        });
        f.actions
            .new_tab_created
            .invoke(tab("https://a.example", "A"))
            .unwrap();

        let state = f.store.state().unwrap();
        assert_eq!(state.id, Some(5));
        assert_eq!(state.title.as_deref(), Some("A"));
    }

    #[test]
    fn test_tab_update_keeps_fields_missing_from_payload() {
        let f = fixture(TabStoreData::default());
        f.actions
            .tab_update
            .invoke(tab("https://a.example", "A"))
            .unwrap();
        f.actions
            .tab_update
            .invoke(TabPayload {
                title: Some("T".to_string()),
                ..TabPayload::default()
            })
            .unwrap();

        let state = f.store.state().unwrap();
        assert_eq!(state.url.as_deref(), Some("https://a.example"));
        assert_eq!(state.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_tab_remove() {
        let f = fixture(TabStoreData::default());
        f.actions.tab_remove.invoke(()).unwrap();

        assert!(f.store.state().unwrap().is_closed);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_tab_change() {
        let f = fixture(TabStoreData {
            url: Some("url 1".to_string()),
            title: Some("title 1".to_string()),
            ..TabStoreData::default()
        });
        f.actions.tab_change.invoke(tab("url 2", "title 2")).unwrap();

        assert_eq!(
            f.store.state().unwrap(),
            TabStoreData {
                url: Some("url 2".to_string()),
                title: Some("title 2".to_string()),
                is_changed: true,
                ..TabStoreData::default()
            }
        );
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_visibility_change_hidden() {
        let f = fixture(TabStoreData::default());
        f.actions.tab_visibility_change.invoke(true).unwrap();

        assert!(f.store.state().unwrap().is_page_hidden);
        assert_eq!(f.probe.count(), 1);
    }

    #[test]
    fn test_visibility_change_unchanged_is_silent() {
        let f = fixture(TabStoreData::default());
        f.actions.tab_visibility_change.invoke(false).unwrap();

        assert_eq!(f.probe.count(), 0);
        assert!(f.backend.writes().is_empty());
    }

    #[test]
    fn test_get_current_state() {
        let f = fixture(TabStoreData::default());
        f.actions.get_current_state.invoke(()).unwrap();
        assert_eq!(f.probe.count(), 1);
    }
}
