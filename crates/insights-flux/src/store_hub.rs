//! Store hubs own a fixed set of stores
//!
//! A hub builds its stores at construction, initializes them once in
//! declaration order, and hands them out for listener registration. Hubs are
//! constructed explicitly at bootstrap and passed by reference; there are no
//! global store instances.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::FluxError;
use crate::store::AnyStore;
use crate::store_names::StoreNames;

/// Distinguishes coexisting hubs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum StoreType {
    GlobalStore,
    TabContextStore,
}

pub trait StoreHub {
    /// Initialize every owned store, in declaration order
    ///
    /// Must be called exactly once.
    fn initialize(&self) -> Result<(), FluxError>;

    /// The fixed list of owned stores
    fn all_stores(&self) -> Vec<&dyn AnyStore>;

    fn store_type(&self) -> StoreType;

    /// Look up an owned store by name
    fn store(&self, id: StoreNames) -> Option<&dyn AnyStore> {
        self.all_stores().into_iter().find(|s| s.store_id() == id)
    }
}

/// Once-only guard for `StoreHub::initialize`
#[derive(Debug, Default)]
pub struct HubLifecycle {
    initialized: Cell<bool>,
}

impl HubLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the hub as initialized, failing if it already was
    pub fn begin_initialize(&self, store_type: StoreType) -> Result<(), FluxError> {
        if self.initialized.replace(true) {
            return Err(FluxError::HubAlreadyInitialized(store_type));
        }
        log::info!("Initializing {} hub", store_type);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }
}
