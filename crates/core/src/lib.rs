//! Marketplace Core - Shared cart types.
//!
//! This crate provides the types shared by every Marketplace component:
//! - `cart` - Cart store, storage backends and provider
//! - `cli` - Command-line tools for inspecting and editing a stored cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, plus cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
