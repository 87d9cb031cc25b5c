//! The cart store: an ordered list of cart lines mirrored to storage.
//!
//! # Write path
//!
//! Every mutator takes the store's lock, applies the change to a copy of the
//! list, writes the whole copy to the storage slot, and only then replaces
//! the in-memory list. This gives two guarantees:
//!
//! - Mutations are serialized. Two concurrent `increment` calls always end
//!   two units higher; neither can overwrite the other's write.
//! - A failed storage write leaves the in-memory cart unchanged, so memory
//!   and storage never disagree after a call returns.
//!
//! No-op mutations (unknown ID, decrement at zero) do not write.

use std::sync::Arc;

use marketplace_core::{CartItem, NewCartItem, ProductId};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::lines::{self, CartChange};
use crate::storage::Storage;

/// Shopping cart backed by a single storage slot.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    key: String,
    items: Mutex<Vec<CartItem>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart stored under `key`.
    ///
    /// An empty slot yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the slot cannot be read and
    /// `CartError::MalformedStoredData` if its contents are not a cart.
    #[instrument(skip_all)]
    pub async fn load(storage: Arc<dyn Storage>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();

        let items: Vec<CartItem> = match storage.get_item(&key).await? {
            Some(blob) => serde_json::from_str(&blob).map_err(|e| {
                warn!(error = %e, "Stored cart could not be decoded");
                CartError::MalformedStoredData(e)
            })?,
            None => Vec::new(),
        };

        info!(key = %key, lines = items.len(), "Cart loaded");

        Ok(Self {
            storage,
            key,
            items: Mutex::new(items),
        })
    }

    /// Storage slot this cart persists to.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current cart lines, in insertion order.
    pub async fn products(&self) -> Vec<CartItem> {
        self.items.lock().await.clone()
    }

    /// The line for `id`, if it is in the cart.
    pub async fn get(&self, id: &ProductId) -> Option<CartItem> {
        let items = self.items.lock().await;
        lines::position(&items, id).and_then(|idx| items.get(idx).cloned())
    }

    /// Total units in the cart (the badge number).
    pub async fn item_count(&self) -> u64 {
        lines::item_count(&self.items.lock().await)
    }

    /// Add a product to the cart.
    ///
    /// A product already in the cart has its quantity bumped instead, exactly
    /// like [`increment`](Self::increment).
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted; the cart is
    /// left unchanged in that case.
    #[instrument(skip(self, candidate), fields(id = %candidate.id))]
    pub async fn add_to_cart(&self, candidate: NewCartItem) -> Result<CartChange> {
        self.mutate(|items| lines::add(items, candidate)).await
    }

    /// Bump the quantity of `id`. Unknown IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<CartChange> {
        self.mutate(|items| lines::increment(items, id)).await
    }

    /// Drop the quantity of `id` by one.
    ///
    /// Lines already at zero stay at zero, and unknown IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<CartChange> {
        self.mutate(|items| lines::decrement(items, id)).await
    }

    /// Empty the cart and remove its storage slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be removed; the cart is left
    /// unchanged in that case.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn clear(&self) -> Result<()> {
        let mut items = self.items.lock().await;
        self.storage.remove_item(&self.key).await?;
        items.clear();
        info!("Cart cleared");
        Ok(())
    }

    /// Apply `op` to a copy of the list, persist it, then commit.
    async fn mutate<F>(&self, op: F) -> Result<CartChange>
    where
        F: FnOnce(&mut Vec<CartItem>) -> CartChange,
    {
        let mut items = self.items.lock().await;

        let mut next = items.clone();
        let change = op(&mut next);
        if !change.is_changed() {
            debug!("Nothing to change, cart not written");
            return Ok(change);
        }

        self.persist(&next).await?;
        *items = next;

        debug!(?change, lines = items.len(), "Cart updated");
        Ok(change)
    }

    async fn persist(&self, items: &[CartItem]) -> Result<()> {
        let blob = serde_json::to_string(items).map_err(CartError::Serialize)?;
        self.storage.set_item(&self.key, blob).await.map_err(|e| {
            warn!(error = %e, "Cart write failed, keeping previous state");
            CartError::from(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use async_trait::async_trait;
    use marketplace_core::Price;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    const KEY: &str = "@marketPlace:cart";

    fn candidate(id: &str) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            title: "T".to_string(),
            image_url: "u".to_string(),
            price: Price::from_cents(1000),
        }
    }

    async fn stored(storage: &MemoryStorage) -> Vec<CartItem> {
        let blob = storage.get_item(KEY).await.unwrap().unwrap();
        serde_json::from_str(&blob).unwrap()
    }

    /// Storage that rejects every write.
    struct ReadOnlyStorage(MemoryStorage);

    #[async_trait]
    impl Storage for ReadOnlyStorage {
        async fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.0.get_item(key).await
        }

        async fn set_item(&self, _key: &str, _value: String) -> std::result::Result<(), StorageError> {
            Err(StorageError::Backend("read-only".to_string()))
        }

        async fn remove_item(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Backend("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_empty_slot_loads_empty_cart() {
        let store = CartStore::load(Arc::new(MemoryStorage::new()), KEY).await.unwrap();
        assert!(store.products().await.is_empty());
        assert_eq!(store.storage_key(), KEY);
    }

    #[tokio::test]
    async fn test_malformed_slot_fails_load() {
        let storage = MemoryStorage::with_item(KEY, "{not a cart");
        let result = CartStore::load(Arc::new(storage), KEY).await;
        assert!(matches!(result, Err(CartError::MalformedStoredData(_))));
    }

    #[tokio::test]
    async fn test_add_persists_full_list() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(Arc::new(storage.clone()), KEY).await.unwrap();

        assert_eq!(store.add_to_cart(candidate("a")).await.unwrap(), CartChange::Added);

        let products = store.products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "a");
        assert_eq!(products[0].quantity, 1);
        assert_eq!(stored(&storage).await, products);
    }

    #[tokio::test]
    async fn test_add_twice_increments() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(Arc::new(storage.clone()), KEY).await.unwrap();

        store.add_to_cart(candidate("a")).await.unwrap();
        assert_eq!(store.add_to_cart(candidate("a")).await.unwrap(), CartChange::Updated);

        let products = store.products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 2);
        assert_eq!(stored(&storage).await, products);
    }

    #[tokio::test]
    async fn test_increment_then_decrement_restores_quantity() {
        let store = CartStore::load(Arc::new(MemoryStorage::new()), KEY).await.unwrap();
        let id = ProductId::new("a");

        store.add_to_cart(candidate("a")).await.unwrap();
        store.increment(&id).await.unwrap();
        store.decrement(&id).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_do_not_write() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(Arc::new(storage.clone()), KEY).await.unwrap();
        let missing = ProductId::new("missing-id");

        assert_eq!(store.increment(&missing).await.unwrap(), CartChange::Unchanged);
        assert_eq!(store.decrement(&missing).await.unwrap(), CartChange::Unchanged);
        assert!(store.products().await.is_empty());
        assert_eq!(storage.get_item(KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_decrement_never_goes_negative() {
        let store = CartStore::load(Arc::new(MemoryStorage::new()), KEY).await.unwrap();
        let id = ProductId::new("a");

        store.add_to_cart(candidate("a")).await.unwrap();
        assert_eq!(store.decrement(&id).await.unwrap(), CartChange::Updated);
        assert_eq!(store.decrement(&id).await.unwrap(), CartChange::Unchanged);
        assert_eq!(store.get(&id).await.unwrap().quantity, 0);

        // zero-quantity lines stay visible and can be bumped back up
        assert_eq!(store.products().await.len(), 1);
        store.increment(&id).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_state() {
        let seed = serde_json::to_string(&vec![CartItem::from(candidate("a"))]).unwrap();
        let storage = ReadOnlyStorage(MemoryStorage::with_item(KEY, seed));
        let store = CartStore::load(Arc::new(storage), KEY).await.unwrap();

        let result = store.add_to_cart(candidate("b")).await;
        assert!(matches!(result, Err(CartError::Storage(_))));

        let result = store.increment(&ProductId::new("a")).await;
        assert!(matches!(result, Err(CartError::Storage(_))));

        let products = store.products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 1);

        assert!(store.clear().await.is_err());
        assert_eq!(store.products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(Arc::new(storage.clone()), KEY).await.unwrap();
        store.add_to_cart(candidate("a")).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.products().await.is_empty());
        assert_eq!(storage.get_item(KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_item_count_sums_quantities() {
        let store = CartStore::load(Arc::new(MemoryStorage::new()), KEY).await.unwrap();
        store.add_to_cart(candidate("a")).await.unwrap();
        store.add_to_cart(candidate("a")).await.unwrap();
        store.add_to_cart(candidate("b")).await.unwrap();
        assert_eq!(store.item_count().await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let storage = MemoryStorage::new();
        let store = Arc::new(CartStore::load(Arc::new(storage.clone()), KEY).await.unwrap());
        store.add_to_cart(candidate("a")).await.unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment(&ProductId::new("a")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.get(&ProductId::new("a")).await.unwrap().quantity, 51);
        assert_eq!(stored(&storage).await[0].quantity, 51);
    }
}
