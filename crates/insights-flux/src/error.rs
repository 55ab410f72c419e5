use thiserror::Error;

use crate::store_hub::StoreType;
use crate::store_names::StoreNames;

/// Errors raised by the dispatch core
///
/// Everything here is a programmer error: misuse of a store or hub, or two
/// stores claiming the same action. Persistence failures are not part of this
/// type since they never reach the caller of an action.
#[derive(Debug, Error)]
pub enum FluxError {
    #[error("{0} was accessed before initialize() was called")]
    NotInitialized(StoreNames),

    #[error("action '{action}' is already handled by {owner}, {requested} cannot register for it")]
    ActionAlreadyOwned {
        action: &'static str,
        owner: StoreNames,
        requested: StoreNames,
    },

    #[error("{0} hub was already initialized")]
    HubAlreadyInitialized(StoreType),

    #[error("failed to serialize state of {store}")]
    Serialization {
        store: StoreNames,
        #[source]
        source: serde_json::Error,
    },
}
