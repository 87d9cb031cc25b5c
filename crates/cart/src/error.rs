//! Unified error handling for the cart.
//!
//! Every cart operation returns `Result<T, CartError>`. Nothing in this crate
//! panics on bad input or failed storage; callers decide how loud to be.

use thiserror::Error;

use crate::storage::StorageError;

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was accessed without a mounted provider.
    #[error("cart must be used within a CartProvider")]
    ProviderMissing,

    /// The stored cart blob could not be decoded at load time.
    #[error("stored cart data is malformed: {0}")]
    MalformedStoredData(#[source] serde_json::Error),

    /// The cart could not be encoded for storage.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Storage read, write or remove failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
