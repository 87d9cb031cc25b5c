//! Cart provider shared across UI components.
//!
//! The provider owns the lifecycle of a [`CartStore`]: [`mount`] loads it
//! from storage, [`cart`] hands out [`CartHandle`]s, and [`unmount`] tears it
//! down. Asking for the cart while nothing is mounted is an explicit
//! [`CartError::ProviderMissing`], never a panic.
//!
//! [`mount`]: CartProvider::mount
//! [`cart`]: CartProvider::cart
//! [`unmount`]: CartProvider::unmount

use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::Storage;
use crate::store::CartStore;

/// Cheaply cloneable reference to a loaded cart.
///
/// Derefs to [`CartStore`], so every cart operation is available directly
/// on the handle. A handle keeps its store alive even after the provider is
/// unmounted.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Arc<CartStore>,
}

impl CartHandle {
    /// Wrap an already loaded store.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Whether two handles point at the same store.
    #[must_use]
    pub fn same_cart(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl Deref for CartHandle {
    type Target = CartStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Owner of the active cart.
///
/// Clones share the same mount state.
#[derive(Debug, Clone, Default)]
pub struct CartProvider {
    inner: Arc<RwLock<Option<CartHandle>>>,
}

impl CartProvider {
    /// Create a provider with nothing mounted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cart from `storage` and make it the active cart.
    ///
    /// Mounting again replaces the previous cart; existing handles keep
    /// pointing at the old one.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or decoded. The
    /// provider's previous state is left as it was.
    pub async fn mount(&self, storage: Arc<dyn Storage>, config: &CartConfig) -> Result<CartHandle> {
        let store = CartStore::load(storage, config.storage_key.clone()).await?;
        let handle = CartHandle::new(store);

        let previous = self.inner.write().await.replace(handle.clone());
        info!(
            key = %config.storage_key,
            remounted = previous.is_some(),
            "Cart provider mounted"
        );

        Ok(handle)
    }

    /// Tear down the active cart, returning its handle if one was mounted.
    pub async fn unmount(&self) -> Option<CartHandle> {
        let previous = self.inner.write().await.take();
        if previous.is_some() {
            info!("Cart provider unmounted");
        }
        previous
    }

    /// Get a handle to the active cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProviderMissing` if no cart is mounted.
    pub async fn cart(&self) -> Result<CartHandle> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or(CartError::ProviderMissing)
    }

    /// Whether a cart is currently mounted.
    pub async fn is_mounted(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::{NewCartItem, Price, ProductId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn candidate(id: &str) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            title: "T".to_string(),
            image_url: "u".to_string(),
            price: Price::from_cents(1000),
        }
    }

    #[tokio::test]
    async fn test_cart_before_mount_is_provider_missing() {
        let provider = CartProvider::new();
        assert!(!provider.is_mounted().await);
        assert!(matches!(
            provider.cart().await,
            Err(CartError::ProviderMissing)
        ));
    }

    #[tokio::test]
    async fn test_handles_share_one_store() {
        let provider = CartProvider::new();
        let storage = Arc::new(MemoryStorage::new());
        provider.mount(storage, &CartConfig::default()).await.unwrap();

        let first = provider.cart().await.unwrap();
        let second = provider.clone().cart().await.unwrap();
        assert!(first.same_cart(&second));

        first.add_to_cart(candidate("a")).await.unwrap();
        assert_eq!(second.products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unmount_revokes_access() {
        let provider = CartProvider::new();
        let handle = provider
            .mount(Arc::new(MemoryStorage::new()), &CartConfig::default())
            .await
            .unwrap();

        assert!(provider.unmount().await.is_some());
        assert!(matches!(
            provider.cart().await,
            Err(CartError::ProviderMissing)
        ));
        assert!(provider.unmount().await.is_none());

        // outstanding handles still work
        handle.add_to_cart(candidate("a")).await.unwrap();
        assert_eq!(handle.item_count().await, 1);
    }

    #[tokio::test]
    async fn test_failed_mount_keeps_previous_cart() {
        let provider = CartProvider::new();
        let config = CartConfig::default();
        let good = provider
            .mount(Arc::new(MemoryStorage::new()), &config)
            .await
            .unwrap();

        let bad = MemoryStorage::with_item(config.storage_key.clone(), "oops");
        let result = provider.mount(Arc::new(bad), &config).await;
        assert!(matches!(result, Err(CartError::MalformedStoredData(_))));

        assert!(provider.cart().await.unwrap().same_cart(&good));
    }
}
