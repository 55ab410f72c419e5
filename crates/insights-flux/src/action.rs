//! Action slots
//!
//! An [`Action`] is a named entry point into exactly one store. The store
//! registers its handler while it initializes; callers invoke the action with
//! a payload and the handler runs synchronously on the caller's stack.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::FluxError;
use crate::store_names::StoreNames;

/// Handler registered for an action
pub type ActionHandler<P> = Rc<dyn Fn(P) -> Result<(), FluxError>>;

struct Registration<P> {
    owner: StoreNames,
    handler: ActionHandler<P>,
}

/// A named, typed action with at most one handler
pub struct Action<P> {
    name: &'static str,
    registration: RefCell<Option<Registration<P>>>,
}

impl<P> Action<P> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            registration: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Store currently handling this action, if any
    pub fn owner(&self) -> Option<StoreNames> {
        self.registration.borrow().as_ref().map(|r| r.owner)
    }

    /// Register `handler` as the handler for this action
    ///
    /// Registering again from the same store replaces the previous handler.
    /// Registering from a different store is rejected: every action has a
    /// single writer.
    pub fn add_listener<F>(&self, owner: StoreNames, handler: F) -> Result<(), FluxError>
    where
        F: Fn(P) -> Result<(), FluxError> + 'static,
    {
        let mut registration = self.registration.borrow_mut();

        if let Some(existing) = registration.as_ref() {
            if existing.owner != owner {
                return Err(FluxError::ActionAlreadyOwned {
                    action: self.name,
                    owner: existing.owner,
                    requested: owner,
                });
            }
            log::debug!("{}: replacing handler for action '{}'", owner, self.name);
        }

        *registration = Some(Registration {
            owner,
            handler: Rc::new(handler),
        });
        Ok(())
    }

    /// Run the registered handler with `payload`
    ///
    /// Without a registered handler this is a no-op.
    pub fn invoke(&self, payload: P) -> Result<(), FluxError> {
        // Release the borrow before running so the handler may touch this slot
        let handler = self
            .registration
            .borrow()
            .as_ref()
            .map(|r| Rc::clone(&r.handler));

        match handler {
            Some(handler) => handler(payload),
            None => {
                log::trace!("Action '{}' invoked without a handler", self.name);
                Ok(())
            }
        }
    }
}

impl<P> fmt::Debug for Action<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("owner", &self.owner())
            .finish()
    }
}
