//! Cart inspection and editing commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! cart-cli show
//!
//! # Add a product (or bump it if already present)
//! cart-cli add --id a --title "Pineapple" --image-url https://cdn.example.com/a.png --price 10
//!
//! # Change quantities
//! cart-cli increment a
//! cart-cli decrement a
//!
//! # Remove the stored cart entirely
//! cart-cli clear
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_KEY` - Storage slot holding the cart
//! - `CART_STORAGE_DIR` - Directory the slot files live in

use std::sync::Arc;

use marketplace_cart::{
    CartChange, CartConfig, CartError, CartHandle, CartProvider, ConfigError, FileStorage,
};
use marketplace_core::{NewCartItem, Price, ProductId};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Cart could not be encoded for output.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Mount the cart described by the environment.
async fn open_cart() -> Result<CartHandle, CartCommandError> {
    let config = CartConfig::from_env()?;
    let storage = FileStorage::new(config.storage_dir.clone());

    info!(
        dir = %storage.root().display(),
        key = %config.storage_key,
        "Opening cart"
    );

    let provider = CartProvider::new();
    Ok(provider.mount(Arc::new(storage), &config).await?)
}

/// Print the cart contents.
///
/// With `json`, the raw stored list is written to stdout so it can be piped
/// into other tools.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded.
pub async fn show(json: bool) -> Result<(), CartCommandError> {
    let cart = open_cart().await?;
    let products = cart.products().await;

    if json {
        write_stdout(&serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    for item in &products {
        info!(
            "  {} x{} @ {} - {} ({})",
            item.id, item.quantity, item.price, item.title, item.image_url
        );
    }
    info!(
        "{} line(s), {} item(s)",
        products.len(),
        cart.item_count().await
    );

    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or saved.
pub async fn add(
    id: String,
    title: String,
    image_url: String,
    price: Price,
) -> Result<(), CartCommandError> {
    let cart = open_cart().await?;
    let id = ProductId::new(id);

    let change = cart
        .add_to_cart(NewCartItem {
            id: id.clone(),
            title,
            image_url,
            price,
        })
        .await?;

    report(&cart, &id, change).await;
    Ok(())
}

/// Bump the quantity of a product already in the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or saved.
pub async fn increment(id: String) -> Result<(), CartCommandError> {
    let cart = open_cart().await?;
    let id = ProductId::new(id);
    let change = cart.increment(&id).await?;
    report(&cart, &id, change).await;
    Ok(())
}

/// Drop the quantity of a product in the cart by one.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or saved.
pub async fn decrement(id: String) -> Result<(), CartCommandError> {
    let cart = open_cart().await?;
    let id = ProductId::new(id);
    let change = cart.decrement(&id).await?;
    report(&cart, &id, change).await;
    Ok(())
}

/// Remove the stored cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or the slot removed.
pub async fn clear() -> Result<(), CartCommandError> {
    let cart = open_cart().await?;
    cart.clear().await?;
    info!(key = %cart.storage_key(), "Stored cart removed");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn write_stdout(output: &str) {
    println!("{output}");
}

async fn report(cart: &CartHandle, id: &ProductId, change: CartChange) {
    match (change, cart.get(id).await) {
        (CartChange::Added, Some(item)) => info!("Added {} ({})", item.id, item.title),
        (CartChange::Updated, Some(item)) => {
            info!("{} quantity is now {}", item.id, item.quantity);
        }
        (CartChange::Unchanged, Some(item)) => {
            warn!("{} left unchanged at quantity {}", item.id, item.quantity);
        }
        (_, None) => warn!("{id} is not in the cart"),
    }
}
