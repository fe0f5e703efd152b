//! Shopping cart kept in the customer's session.
//!
//! A line is keyed by product, frame style and size. The unit price is
//! captured when the line is added so later catalog edits do not change what
//! the customer sees in their cart.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::is_frame_category;
use crate::types::{FrameStyleId, Money, ProductId, SizeOptionId};

/// Upper bound on the quantity of a single line.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("cart line not found: {0}")]
    LineNotFound(CartLineId),
    #[error("invalid cart line id: {0}")]
    InvalidLineId(String),
}

/// Identity of a cart line: product plus chosen frame style and size.
///
/// Rendered as `p{product}-f{frame}-s{size}` with `0` standing in for "none",
/// which gives clients a stable handle for update and remove calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartLineId {
    pub product_id: ProductId,
    pub frame_style_id: Option<FrameStyleId>,
    pub size_id: Option<SizeOptionId>,
}

impl fmt::Display for CartLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p{}-f{}-s{}",
            self.product_id,
            self.frame_style_id.map_or(0, |id| id.as_i32()),
            self.size_id.map_or(0, |id| id.as_i32())
        )
    }
}

impl FromStr for CartLineId {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CartError::InvalidLineId(s.to_owned());

        let mut parts = s.split('-');
        let (Some(p), Some(f), Some(sz), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let number = |part: &str, tag: char| -> Result<i32, CartError> {
            part.strip_prefix(tag)
                .and_then(|n| n.parse::<i32>().ok())
                .filter(|n| *n >= 0)
                .ok_or_else(invalid)
        };
        let optional = |n: i32| (n != 0).then_some(n);

        let product = number(p, 'p')?;
        if product == 0 {
            return Err(invalid());
        }

        Ok(Self {
            product_id: ProductId::new(product),
            frame_style_id: optional(number(f, 'f')?).map(FrameStyleId::new),
            size_id: optional(number(sz, 's')?).map(SizeOptionId::new),
        })
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub image: Option<String>,
    pub frame_style_id: Option<FrameStyleId>,
    pub frame_style_name: Option<String>,
    pub size_id: Option<SizeOptionId>,
    pub size_name: Option<String>,
    /// Product price plus frame and size surcharges.
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartItem {
    /// This line's identity.
    #[must_use]
    pub const fn line_id(&self) -> CartLineId {
        CartLineId {
            product_id: self.product_id,
            frame_style_id: self.frame_style_id,
            size_id: self.size_id,
        }
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// True if this line counts toward the bulk frame discount.
    #[must_use]
    pub fn is_frame(&self) -> bool {
        is_frame_category(&self.category)
    }
}

/// The session cart. Serializes as a plain list of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Session key the cart is stored under.
    pub const SESSION_KEY: &'static str = "cart";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, merging into an existing line with the same identity.
    ///
    /// Quantities are capped at [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `item.quantity` is zero.
    pub fn add(&mut self, item: CartItem) -> Result<&CartItem, CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let line_id = item.line_id();
        if let Some(existing) = self.items.iter_mut().find(|i| i.line_id() == line_id) {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(MAX_LINE_QUANTITY);
        } else {
            let mut item = item;
            item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
            self.items.push(item);
        }

        self.line(line_id).ok_or(CartError::LineNotFound(line_id))
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns the updated line, or `None` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has this identity.
    pub fn set_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<Option<&CartItem>, CartError> {
        if quantity == 0 {
            return self
                .remove(line_id)
                .map(|_| None)
                .ok_or(CartError::LineNotFound(line_id));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.line_id() == line_id)
            .ok_or(CartError::LineNotFound(line_id))?;
        item.quantity = quantity.min(MAX_LINE_QUANTITY);
        Ok(Some(&*item))
    }

    /// Take one unit off a line, removing the line when it was the last unit.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has this identity.
    pub fn decrement(&mut self, line_id: CartLineId) -> Result<Option<&CartItem>, CartError> {
        let current = self
            .line(line_id)
            .ok_or(CartError::LineNotFound(line_id))?
            .quantity;
        self.set_quantity(line_id, current.saturating_sub(1))
    }

    /// Remove a line. Returns the removed line if it existed.
    pub fn remove(&mut self, line_id: CartLineId) -> Option<CartItem> {
        self.position(line_id).map(|index| self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Units in the frames category.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| item.is_frame())
            .map(|item| item.quantity)
            .sum()
    }

    /// Look up a line by identity.
    #[must_use]
    pub fn line(&self, line_id: CartLineId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.line_id() == line_id)
    }

    fn position(&self, line_id: CartLineId) -> Option<usize> {
        self.items.iter().position(|item| item.line_id() == line_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(product: i32, category: &str, rupees: i64, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            slug: format!("product-{product}"),
            title: format!("Product {product}"),
            category: category.to_string(),
            image: None,
            frame_style_id: None,
            frame_style_name: None,
            size_id: None,
            size_name: None,
            unit_price: Money::from_rupees(rupees),
            quantity,
        }
    }

    #[test]
    fn test_add_merges_same_line() {
        let mut cart = Cart::new();
        cart.add(item(1, "posters", 100, 1)).expect("add");
        cart.add(item(1, "posters", 100, 2)).expect("add");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_keeps_variants_separate() {
        let mut cart = Cart::new();
        cart.add(item(1, "frames", 100, 1)).expect("add");
        let mut framed = item(1, "frames", 150, 1);
        framed.frame_style_id = Some(FrameStyleId::new(2));
        cart.add(framed).expect("add");
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn test_add_rejects_zero_and_caps_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(item(1, "posters", 10, 0)), Err(CartError::ZeroQuantity));
        cart.add(item(1, "posters", 10, 80)).expect("add");
        let line = cart.add(item(1, "posters", 10, 80)).expect("add");
        assert_eq!(line.quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_decrement_last_unit_removes_line() {
        let mut cart = Cart::new();
        let id = cart.add(item(1, "posters", 100, 2)).expect("add").line_id();

        let line = cart.decrement(id).expect("decrement");
        assert_eq!(line.map(|l| l.quantity), Some(1));

        let line = cart.decrement(id).expect("decrement");
        assert!(line.is_none());
        assert!(cart.is_empty());
        assert_eq!(cart.decrement(id), Err(CartError::LineNotFound(id)));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        let id = cart.add(item(1, "posters", 100, 2)).expect("add").line_id();
        assert!(cart.set_quantity(id, 0).expect("set").is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_and_frame_count() {
        let mut cart = Cart::new();
        cart.add(item(1, "frames", 300, 2)).expect("add");
        cart.add(item(2, "Frames", 250, 3)).expect("add");
        cart.add(item(3, "posters", 99, 1)).expect("add");
        assert_eq!(cart.subtotal(), Money::from_rupees(1449));
        assert_eq!(cart.frame_count(), 5);
    }

    #[test]
    fn test_line_id_roundtrip() {
        let id = CartLineId {
            product_id: ProductId::new(12),
            frame_style_id: Some(FrameStyleId::new(3)),
            size_id: None,
        };
        assert_eq!(id.to_string(), "p12-f3-s0");
        assert_eq!("p12-f3-s0".parse::<CartLineId>(), Ok(id));
    }

    #[test]
    fn test_line_id_rejects_garbage() {
        for bad in ["", "p1", "p1-f2", "x1-f0-s0", "p0-f0-s0", "p1-f-1-s0", "p1-f0-s0-x"] {
            assert!(bad.parse::<CartLineId>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_cart_serializes_as_list() {
        let mut cart = Cart::new();
        cart.add(item(1, "posters", 100, 1)).expect("add");
        let json = serde_json::to_value(&cart).expect("serialize");
        assert!(json.is_array());
        let back: Cart = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
