//! Integration tests for the Marketplace cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store behavior against real file-backed storage
//! - `cart_provider` - Provider lifecycle as seen by UI code
//!
//! Tests run against a fresh temporary directory each, so they need no
//! external services.

use std::sync::Arc;

use marketplace_cart::{CartConfig, CartHandle, CartProvider, CartStore, FileStorage};
use marketplace_core::{NewCartItem, Price, ProductId};
use tempfile::TempDir;

/// A file-backed cart rooted in its own temporary directory.
///
/// The directory is deleted when the context is dropped.
pub struct TestCart {
    /// Temporary directory holding the slot files.
    pub dir: TempDir,
    /// Storage rooted in `dir`.
    pub storage: FileStorage,
    /// Configuration pointing at `dir`.
    pub config: CartConfig,
}

impl TestCart {
    /// Create a context with an empty storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path());
        let config = CartConfig {
            storage_dir: dir.path().to_path_buf(),
            ..CartConfig::default()
        };
        Self {
            dir,
            storage,
            config,
        }
    }

    /// Load a fresh store from the context's storage, as an app restart would.
    ///
    /// # Panics
    ///
    /// Panics if the stored cart cannot be loaded.
    pub async fn load(&self) -> CartStore {
        CartStore::load(Arc::new(self.storage.clone()), self.config.storage_key.clone())
            .await
            .expect("Failed to load cart")
    }

    /// Mount a provider over the context's storage.
    ///
    /// # Panics
    ///
    /// Panics if the stored cart cannot be loaded.
    pub async fn mount(&self) -> (CartProvider, CartHandle) {
        let provider = CartProvider::new();
        let handle = provider
            .mount(Arc::new(self.storage.clone()), &self.config)
            .await
            .expect("Failed to mount cart");
        (provider, handle)
    }

    /// Raw contents of the cart slot, if any.
    #[must_use]
    pub fn raw_slot(&self) -> Option<String> {
        std::fs::read_to_string(self.storage.path_for(&self.config.storage_key)).ok()
    }

    /// Write raw contents into the cart slot.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_raw_slot(&self, contents: &str) {
        std::fs::write(self.storage.path_for(&self.config.storage_key), contents)
            .expect("Failed to write slot");
    }
}

impl Default for TestCart {
    fn default() -> Self {
        Self::new()
    }
}

/// A cart candidate with predictable fields derived from `id`.
#[must_use]
pub fn candidate(id: &str) -> NewCartItem {
    NewCartItem {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://cdn.example.com/{id}.png"),
        price: Price::from_cents(1000),
    }
}
