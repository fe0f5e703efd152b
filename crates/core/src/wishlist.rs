//! Session wishlist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ProductSummary;
use crate::types::ProductId;

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(flatten)]
    pub product: ProductSummary,
    pub added_at: DateTime<Utc>,
}

/// Products the customer saved for later, newest first.
///
/// Holds at most one entry per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    /// Session key the wishlist is stored under.
    pub const SESSION_KEY: &'static str = "wishlist";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product.id == product_id)
    }

    /// Save a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product: ProductSummary, now: DateTime<Utc>) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.items.insert(0, WishlistItem { product, added_at: now });
        true
    }

    /// Remove a product. Returns the removed entry if present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<WishlistItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product.id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns `true` if the product is saved afterwards.
    pub fn toggle(&mut self, product: ProductSummary, now: DateTime<Utc>) -> bool {
        if self.remove(product.id).is_some() {
            false
        } else {
            self.add(product, now)
        }
    }
}
