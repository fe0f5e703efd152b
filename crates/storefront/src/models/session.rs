//! Session-related types.
//!
//! Types stored in the session for authentication state and the
//! namespaced keys of the session-held shopping lists.

use serde::{Deserialize, Serialize};

use frameshop_core::{Email, UserId};

/// The signed-in customer, as kept in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

/// Session keys.
pub mod keys {
    pub const CURRENT_USER: &str = "account.user";

    /// Key for the shopping cart.
    pub const CART: &str = frameshop_core::Cart::SESSION_KEY;

    /// Key for the wishlist.
    pub const WISHLIST: &str = frameshop_core::Wishlist::SESSION_KEY;

    /// Key for the recently viewed products.
    pub const RECENTLY_VIEWED: &str = frameshop_core::RecentlyViewed::SESSION_KEY;
}
