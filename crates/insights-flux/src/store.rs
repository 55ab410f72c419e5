//! Store - single-writer state container with change notification
//!
//! A store owns exactly one state value. The value is assigned once by
//! `initialize()` and afterwards only mutated by the handlers the store
//! registers on its actions. After a handler changes the state it calls
//! `emit_changed()`, which runs every change listener synchronously.
//!
//! # Snapshot policy
//!
//! Callers never receive a reference into the owned value. [`BaseStore::state`]
//! returns a clone, [`BaseStore::with_state`] lends the value for the duration
//! of a closure, and [`BaseStore::update`] mutates it in place. Listeners read
//! the fresh state themselves; they are called without arguments.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::error::FluxError;
use crate::store_names::StoreNames;

/// Zero-argument change callback
pub type ChangeListener = Rc<dyn Fn()>;

/// Handle returned when a change listener is added, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// State cell plus change listeners, shared by every concrete store
pub struct BaseStore<S> {
    id: StoreNames,
    state: RefCell<Option<S>>,
    listeners: RefCell<Vec<(ListenerId, ChangeListener)>>,
    next_listener_id: Cell<u64>,
}

impl<S> BaseStore<S> {
    pub fn new(id: StoreNames) -> Self {
        Self {
            id,
            state: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
        }
    }

    pub fn id(&self) -> StoreNames {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Assign the state value, replacing any previous one
    ///
    /// Only `initialize()` and action handlers may call this.
    pub fn replace_state(&self, state: S) {
        *self.state.borrow_mut() = Some(state);
    }

    /// Lend the current state to `f`
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, FluxError> {
        let state = self.state.borrow();
        let state = state.as_ref().ok_or(FluxError::NotInitialized(self.id))?;
        Ok(f(state))
    }

    /// Mutate the current state in place
    ///
    /// The borrow ends before this returns, so the caller can emit afterwards.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, FluxError> {
        let mut state = self.state.borrow_mut();
        let state = state.as_mut().ok_or(FluxError::NotInitialized(self.id))?;
        Ok(f(state))
    }

    pub fn add_changed_listener(&self, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns `false` if no listener with that id was registered
    pub fn remove_changed_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Notify every listener registered at the time of the call, in order
    pub fn emit_changed(&self) {
        // Snapshot so listeners can add or remove listeners while we iterate
        let listeners: Vec<ChangeListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        log::trace!("{}: notifying {} listener(s)", self.id, listeners.len());
        for listener in listeners {
            listener();
        }
    }
}

impl<S: Clone> BaseStore<S> {
    /// Owned snapshot of the current state
    pub fn state(&self) -> Result<S, FluxError> {
        self.with_state(S::clone)
    }
}

/// Access to a store's state cell and its change emission
///
/// [`BaseStore`] notifies listeners directly. [`crate::PersistentStore`]
/// overrides [`StateHolder::emit_changed`] to persist first.
pub trait StateHolder<S> {
    fn base(&self) -> &BaseStore<S>;

    fn emit_changed(&self) {
        self.base().emit_changed();
    }

    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, FluxError> {
        self.base().update(f)
    }

    fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, FluxError> {
        self.base().with_state(f)
    }

    fn replace_state(&self, state: S) {
        self.base().replace_state(state);
    }

    /// Mutate in place and emit only if the state ended up different
    ///
    /// Returns whether listeners were notified.
    fn update_and_emit(&self, f: impl FnOnce(&mut S)) -> Result<bool, FluxError>
    where
        S: Clone + PartialEq,
    {
        let changed = self.update(|state| {
            let before = state.clone();
            f(state);
            *state != before
        })?;

        if changed {
            self.emit_changed();
        }
        Ok(changed)
    }
}

impl<S> StateHolder<S> for BaseStore<S> {
    fn base(&self) -> &BaseStore<S> {
        self
    }
}

/// Typed store contract implemented by every concrete store
pub trait Store {
    type State: Clone + 'static;

    fn base(&self) -> &BaseStore<Self::State>;

    /// State used by `initialize()` when no explicit initial state is given
    fn default_state(&self) -> Self::State;

    /// Register one handler per consumed action
    fn add_action_listeners(&self) -> Result<(), FluxError>;

    fn id(&self) -> StoreNames {
        self.base().id()
    }

    fn initialize(&self, initial_state: Option<Self::State>) -> Result<(), FluxError> {
        let state = initial_state.unwrap_or_else(|| self.default_state());
        self.base().replace_state(state);
        log::debug!("{}: initialized", self.id());
        self.add_action_listeners()
    }

    fn state(&self) -> Result<Self::State, FluxError> {
        self.base().state()
    }

    fn add_changed_listener(&self, listener: ChangeListener) -> ListenerId {
        self.base().add_changed_listener(listener)
    }

    fn remove_changed_listener(&self, id: ListenerId) -> bool {
        self.base().remove_changed_listener(id)
    }
}

/// Object-safe view of a store, used by hubs and UI layers that treat all
/// stores uniformly
pub trait AnyStore {
    fn store_id(&self) -> StoreNames;
    fn is_initialized(&self) -> bool;
    fn subscribe(&self, listener: ChangeListener) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId) -> bool;
    /// Current state as JSON, for aggregate state bags
    fn state_json(&self) -> Result<serde_json::Value, FluxError>;
}

impl<T> AnyStore for T
where
    T: Store,
    T::State: Serialize,
{
    fn store_id(&self) -> StoreNames {
        self.base().id()
    }

    fn is_initialized(&self) -> bool {
        self.base().is_initialized()
    }

    fn subscribe(&self, listener: ChangeListener) -> ListenerId {
        self.base().add_changed_listener(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.base().remove_changed_listener(id)
    }

    fn state_json(&self) -> Result<serde_json::Value, FluxError> {
        let id = self.base().id();
        self.base()
            .with_state(|state| serde_json::to_value(state))?
            .map_err(|source| FluxError::Serialization { store: id, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    struct CounterState {
        value: i32,
    }

    struct CounterStore {
        store: Rc<BaseStore<CounterState>>,
        increment: Rc<Action<i32>>,
    }

    impl CounterStore {
        fn new(increment: Rc<Action<i32>>) -> Self {
            Self {
                store: Rc::new(BaseStore::new(StoreNames::TabStore)),
                increment,
            }
        }
    }

    impl Store for CounterStore {
        type State = CounterState;

        fn base(&self) -> &BaseStore<CounterState> {
            &self.store
        }

        fn default_state(&self) -> CounterState {
            CounterState::default()
        }

        fn add_action_listeners(&self) -> Result<(), FluxError> {
            let store = Rc::clone(&self.store);
            self.increment.add_listener(self.id(), move |by| {
                if by == 0 {
                    return Ok(());
                }
                store.update(|state| state.value += by)?;
                store.emit_changed();
                Ok(())
            })
        }
    }

    fn counting_listener(count: &Rc<Cell<usize>>) -> ChangeListener {
        let count = Rc::clone(count);
        Rc::new(move || count.set(count.get() + 1))
    }

    #[test]
    fn test_state_before_initialize_fails_fast() {
        let store = CounterStore::new(Rc::new(Action::new("increment")));
        assert!(matches!(
            store.state(),
            Err(FluxError::NotInitialized(StoreNames::TabStore))
        ));
        assert!(!store.is_initialized());
    }

    #[test]
    fn test_initialize_uses_override_then_default() {
        let store = CounterStore::new(Rc::new(Action::new("increment")));
        store
            .initialize(Some(CounterState { value: 5 }))
            .unwrap();
        assert_eq!(store.state().unwrap().value, 5);

        let other = CounterStore::new(Rc::new(Action::new("increment")));
        other.initialize(None).unwrap();
        assert_eq!(other.state().unwrap(), CounterState::default());
    }

    #[test]
    fn test_action_mutates_and_notifies_once() {
        let increment = Rc::new(Action::new("increment"));
        let store = CounterStore::new(Rc::clone(&increment));
        store.initialize(None).unwrap();

        let count = Rc::new(Cell::new(0));
        store.add_changed_listener(counting_listener(&count));

        increment.invoke(2).unwrap();
        assert_eq!(store.state().unwrap().value, 2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unchanged_state_does_not_notify() {
        let increment = Rc::new(Action::new("increment"));
        let store = CounterStore::new(Rc::clone(&increment));
        store.initialize(None).unwrap();

        let count = Rc::new(Cell::new(0));
        store.add_changed_listener(counting_listener(&count));

        increment.invoke(0).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_snapshot_is_detached_from_store() {
        let increment = Rc::new(Action::new("increment"));
        let store = CounterStore::new(Rc::clone(&increment));
        store.initialize(None).unwrap();

        let mut snapshot = store.state().unwrap();
        snapshot.value = 100;
        assert_eq!(store.state().unwrap().value, 0);
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let increment = Rc::new(Action::new("increment"));
        let store = CounterStore::new(Rc::clone(&increment));
        store.initialize(None).unwrap();

        let count = Rc::new(Cell::new(0));
        let id = store.add_changed_listener(counting_listener(&count));
        assert!(store.remove_changed_listener(id));
        assert!(!store.remove_changed_listener(id));

        increment.invoke(1).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let base: BaseStore<CounterState> = BaseStore::new(StoreNames::TabStore);
        let order = Rc::new(RefCell::new(Vec::new()));

        for n in 0..3 {
            let order = Rc::clone(&order);
            base.add_changed_listener(Rc::new(move || order.borrow_mut().push(n)));
        }

        base.emit_changed();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_listener_removed_during_notification_still_runs_this_round() {
        let base = Rc::new(BaseStore::<CounterState>::new(StoreNames::TabStore));
        let second_calls = Rc::new(Cell::new(0));
        let second_id = Rc::new(Cell::new(None));

        // The first listener removes the second one mid-notification
        let remover_base = Rc::clone(&base);
        let remover_id = Rc::clone(&second_id);
        base.add_changed_listener(Rc::new(move || {
            if let Some(id) = remover_id.get() {
                remover_base.remove_changed_listener(id);
            }
        }));
        second_id.set(Some(base.add_changed_listener(counting_listener(&second_calls))));

        base.emit_changed();
        assert_eq!(second_calls.get(), 1);

        base.emit_changed();
        assert_eq!(second_calls.get(), 1);
    }

    #[test]
    fn test_listener_added_during_notification_waits_for_next_round() {
        let base = Rc::new(BaseStore::<CounterState>::new(StoreNames::TabStore));
        let late_calls = Rc::new(Cell::new(0));

        let adder_base = Rc::clone(&base);
        let late = Rc::clone(&late_calls);
        let added = Rc::new(Cell::new(false));
        base.add_changed_listener(Rc::new(move || {
            if !added.replace(true) {
                adder_base.add_changed_listener(counting_listener(&late));
            }
        }));

        base.emit_changed();
        assert_eq!(late_calls.get(), 0);

        base.emit_changed();
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_listener_can_read_state_during_notification() {
        let increment = Rc::new(Action::new("increment"));
        let store = CounterStore::new(Rc::clone(&increment));
        store.initialize(None).unwrap();

        let seen = Rc::new(Cell::new(0));
        let reader = Rc::clone(&store.store);
        let sink = Rc::clone(&seen);
        store.add_changed_listener(Rc::new(move || {
            sink.set(reader.state().map(|s| s.value).unwrap_or(-1));
        }));

        increment.invoke(9).unwrap();
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn test_update_and_emit_skips_unchanged_state() {
        let base: BaseStore<CounterState> = BaseStore::new(StoreNames::TabStore);
        base.replace_state(CounterState { value: 1 });
        let count = Rc::new(Cell::new(0));
        base.add_changed_listener(counting_listener(&count));

        assert!(!StateHolder::update_and_emit(&base, |state| state.value = 1).unwrap());
        assert_eq!(count.get(), 0);

        assert!(StateHolder::update_and_emit(&base, |state| state.value = 2).unwrap());
        assert_eq!(count.get(), 1);
        assert_eq!(base.state().unwrap().value, 2);
    }

    #[test]
    fn test_any_store_exposes_json_state() {
        let store = CounterStore::new(Rc::new(Action::new("increment")));
        store.initialize(Some(CounterState { value: 3 })).unwrap();

        let any: &dyn AnyStore = &store;
        assert_eq!(any.store_id(), StoreNames::TabStore);
        assert!(any.is_initialized());
        assert_eq!(any.state_json().unwrap(), serde_json::json!({ "value": 3 }));
    }
}
