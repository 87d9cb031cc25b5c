//! Cart line item types.
//!
//! A [`CartItem`] is one line in the shopper's cart. The storage format is
//! the JSON object the mobile app has always written:
//!
//! ```json
//! { "id": "a", "title": "T", "image_url": "u", "price": 10, "quantity": 1 }
//! ```

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product being added to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Catalog product ID; unique within a cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product thumbnail URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product ID; unique within a cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product thumbnail URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Units in the cart. Zero is a valid, visible state.
    pub quantity: u32,
}

impl CartItem {
    /// Bump the quantity by one. A line at zero goes back to one.
    pub const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Drop the quantity by one.
    ///
    /// Returns `false` (and leaves the line untouched) when the quantity is
    /// already zero.
    pub const fn decrement(&mut self) -> bool {
        if self.quantity == 0 {
            return false;
        }
        self.quantity -= 1;
        true
    }
}

impl From<NewCartItem> for CartItem {
    /// A freshly added line always starts at quantity 1.
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: 1,
        }
    }
}
