//! Marketplace Cart - Persistent shopping cart for the mobile storefront.
//!
//! The cart is an ordered list of [`CartItem`]s held in memory and mirrored,
//! as one JSON blob, to a key-value storage slot after every change. It is
//! loaded once when a [`CartProvider`] is mounted.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the list and the write path (serialized, persist-then-commit)
//! - [`CartProvider`] owns the store's lifecycle and hands out [`CartHandle`]s
//! - [`Storage`] is the seam to the device's key-value store
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use marketplace_cart::{CartConfig, CartProvider, MemoryStorage};
//! use marketplace_core::{NewCartItem, Price, ProductId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), marketplace_cart::CartError> {
//! let provider = CartProvider::new();
//! provider
//!     .mount(Arc::new(MemoryStorage::new()), &CartConfig::default())
//!     .await?;
//!
//! let cart = provider.cart().await?;
//! cart.add_to_cart(NewCartItem {
//!     id: ProductId::new("a"),
//!     title: "Pineapple".to_string(),
//!     image_url: "https://cdn.example.com/a.png".to_string(),
//!     price: Price::from_cents(1000),
//! })
//! .await?;
//!
//! assert_eq!(cart.item_count().await, 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod lines;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use lines::CartChange;
pub use marketplace_core::{CartItem, NewCartItem, Price, ProductId};
pub use provider::{CartHandle, CartProvider};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::CartStore;
