//! Flux-style state core for the insights background process
//!
//! This crate provides:
//! - [`Action`] slots that route a typed payload to exactly one store handler
//! - [`BaseStore`] / [`PersistentStore`] state containers with change listeners
//! - The [`Store`] and [`AnyStore`] traits concrete stores implement
//! - The [`StoreHub`] trait for owning and initializing a fixed set of stores
//! - The [`KeyValueStore`] backend trait used for durable snapshots
//!
//! ```text
//! Action::invoke → store handler → state mutation → emit_changed → listeners
//!                                                       └─→ persist (fire-and-forget)
//! ```

pub mod action;
pub mod error;
pub mod key_value;
pub mod persistent_store;
pub mod store;
pub mod store_hub;
pub mod store_names;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use action::Action;
pub use error::FluxError;
pub use key_value::{BoxFuture, KeyValueStore, StorageError};
pub use persistent_store::{spawn_write, PersistFuture, PersistentStore};
pub use store::{AnyStore, BaseStore, ChangeListener, ListenerId, StateHolder, Store};
pub use store_hub::{HubLifecycle, StoreHub, StoreType};
pub use store_names::StoreNames;
