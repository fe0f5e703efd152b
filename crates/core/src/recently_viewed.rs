//! Bounded, most-recent-first history of product views.

use serde::{Deserialize, Serialize};

use crate::catalog::ProductSummary;
use crate::types::ProductId;

/// Products the customer looked at recently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyViewed {
    items: Vec<ProductSummary>,
}

impl RecentlyViewed {
    /// Session key the history is stored under.
    pub const SESSION_KEY: &'static str = "recently_viewed";

    /// Maximum number of entries kept.
    pub const CAPACITY: usize = 10;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[ProductSummary] {
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

    /// Record a view: moves the product to the front and drops the oldest
    /// entries beyond [`Self::CAPACITY`].
    pub fn record(&mut self, product: ProductSummary) {
        self.items.retain(|item| item.id != product.id);
        self.items.insert(0, product);
        self.items.truncate(Self::CAPACITY);
    }

    /// Entries other than `product_id`, for "you also viewed" lists.
    pub fn excluding(&self, product_id: ProductId) -> impl Iterator<Item = &ProductSummary> {
        self.items.iter().filter(move |item| item.id != product_id)
    }
}
