//! HTTP route handlers for storefront.
//!
//! Every response is JSON with a `success` flag. Errors render through
//! [`AppError`](crate::error::AppError).
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/products                         - Product listing (category, search, page)
//! GET    /api/products/{slug}                  - Product detail (records recently viewed)
//! GET    /api/categories                       - Distinct categories
//! GET    /api/frame-styles                     - Available frame styles
//! GET    /api/sizes                            - Available print sizes
//! GET    /api/settings                         - Public store settings
//! GET    /api/recently-viewed                  - Recently viewed products
//!
//! # Cart (session)
//! GET    /api/cart                             - Cart with quote (?payment_method=)
//! DELETE /api/cart                             - Clear cart
//! GET    /api/cart/count                       - Item count badge
//! POST   /api/cart/items                       - Add line
//! PUT    /api/cart/items/{line_id}             - Set quantity (0 removes)
//! DELETE /api/cart/items/{line_id}             - Remove line
//! POST   /api/cart/items/{line_id}/decrement   - Decrement by one
//!
//! # Wishlist (session)
//! GET    /api/wishlist                         - Wishlist
//! POST   /api/wishlist                         - Add product
//! POST   /api/wishlist/toggle                  - Toggle product
//! DELETE /api/wishlist/{product_id}            - Remove product
//! POST   /api/wishlist/{product_id}/move-to-cart - Move to cart
//!
//! # Checkout
//! GET    /api/checkout/quote                   - Price breakdown (?payment_method=)
//! POST   /api/orders                           - Place order
//! POST   /api/payments/verify                  - Verify gateway payment
//!
//! # Auth
//! POST   /api/auth/register                    - Create account and log in
//! POST   /api/auth/login                       - Log in
//! POST   /api/auth/logout                      - Log out
//! GET    /api/auth/me                          - Current customer
//!
//! # Account (requires auth)
//! GET    /api/account/orders                   - Order history
//! GET    /api/account/orders/{id}              - Order detail with items
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use axum::{Json, Router};
use serde::Serialize;

use crate::middleware::{api_rate_limiter, auth_rate_limiter, checkout_rate_limiter};
use crate::state::AppState;

/// Successful response envelope: `{"success": true, ...fields}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub const fn ok<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let browsing = Router::new()
        .merge(catalog::router())
        .merge(cart::router())
        .merge(wishlist::router())
        .merge(account::router())
        .layer(api_rate_limiter());

    Router::new()
        .merge(browsing)
        .merge(checkout::router().layer(checkout_rate_limiter()))
        .merge(auth::router().layer(auth_rate_limiter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Count {
        count: u32,
    }

    #[test]
    fn test_success_envelope_flattens() {
        let Json(body) = ok(Count { count: 3 });
        let value = serde_json::to_value(body).expect("serialize");
        assert_eq!(value, serde_json::json!({ "success": true, "count": 3 }));
    }
}
