//! Key-value storage for persisted carts.
//!
//! The cart is written as a single JSON string under one key (a "slot").
//! Backends only need to get, set and remove whole string values; the cart
//! store owns serialization.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - In-process map, for tests and guest sessions
//! - [`FileStorage`] - One file per key under a directory, atomic replace on write

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors that can occur when talking to a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        /// Slot key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A backend-specific failure that is not an I/O error.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Async key-value storage with string keys and string values.
///
/// Implementations must be safe to share across tasks; the cart store holds
/// them as `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing an empty slot is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
