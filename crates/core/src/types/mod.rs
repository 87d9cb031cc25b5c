//! Core types for the Marketplace cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{CartItem, NewCartItem};
pub use id::*;
pub use price::{Price, PriceError};
