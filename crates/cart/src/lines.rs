//! Pure operations on the ordered list of cart lines.
//!
//! These functions never touch storage. [`CartStore`](crate::CartStore)
//! applies them to a copy of its list, persists the copy, and only then
//! commits it.
//!
//! All lookups use the first line with a matching ID, so a list that somehow
//! contains duplicates (e.g. hand-edited storage) still behaves predictably.

use marketplace_core::{CartItem, NewCartItem, ProductId};

/// What a mutation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added,
    /// An existing line's quantity changed.
    Updated,
    /// Nothing changed and nothing was written.
    Unchanged,
}

impl CartChange {
    /// Whether the list was modified.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Index of the first line with `id`.
#[must_use]
pub fn position(items: &[CartItem], id: &ProductId) -> Option<usize> {
    items.iter().position(|item| &item.id == id)
}

/// Add a product, or bump its quantity if it is already in the cart.
pub fn add(items: &mut Vec<CartItem>, candidate: NewCartItem) -> CartChange {
    if position(items, &candidate.id).is_some() {
        return increment(items, &candidate.id);
    }
    items.push(CartItem::from(candidate));
    CartChange::Added
}

/// Bump the quantity of the line with `id`. Unknown IDs are ignored.
pub fn increment(items: &mut [CartItem], id: &ProductId) -> CartChange {
    match items.iter_mut().find(|item| &item.id == id) {
        Some(item) => {
            item.increment();
            CartChange::Updated
        }
        None => CartChange::Unchanged,
    }
}

/// Drop the quantity of the line with `id`.
///
/// Lines already at zero and unknown IDs are left alone.
pub fn decrement(items: &mut [CartItem], id: &ProductId) -> CartChange {
    let changed = items
        .iter_mut()
        .find(|item| &item.id == id)
        .is_some_and(|item| item.decrement());

    if changed {
        CartChange::Updated
    } else {
        CartChange::Unchanged
    }
}

/// Total units across all lines.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}
