//! Background stores of the insights accessibility tooling
//!
//! Global and per-tab store hubs built on `insights-flux`, the snapshot
//! bootstrap that restores them and the dispatcher that routes inbound
//! messages onto their actions.

pub mod actions;
pub mod data_keys;
pub mod dispatcher;
pub mod logger;
pub mod notification;
pub mod persisted_data;
pub mod state;
pub mod stores;

pub use dispatcher::{ActionMessage, Dispatcher, StoreChange};
pub use persisted_data::{load_all_persisted_data, PersistedData};
