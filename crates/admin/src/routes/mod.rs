//! HTTP route handlers for admin.
//!
//! Every response is JSON with a `success` flag. All routes except login
//! require an admin session through [`RequireAdmin`](crate::middleware::RequireAdmin).
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/login                       - Log in (admin role required)
//! POST   /api/auth/logout                      - Log out
//! GET    /api/auth/me                          - Current admin
//!
//! # Products
//! GET    /api/products                         - List (?search=&page=&per_page=)
//! POST   /api/products                         - Create
//! GET    /api/products/{id}                    - Get
//! PUT    /api/products/{id}                    - Update
//! DELETE /api/products/{id}                    - Delete
//! POST   /api/products/generate-metadata       - Title/description/slug from an image
//!
//! # Frame styles and sizes
//! GET    /api/frame-styles                     - List, including unavailable
//! POST   /api/frame-styles                     - Create
//! PUT    /api/frame-styles/{id}                - Update
//! DELETE /api/frame-styles/{id}                - Delete
//! POST   /api/frame-styles/{id}/toggle         - Flip availability
//! GET    /api/sizes                            - List, including unavailable
//! POST   /api/sizes                            - Create
//! PUT    /api/sizes/{id}                       - Update
//! DELETE /api/sizes/{id}                       - Delete
//! POST   /api/sizes/{id}/toggle                - Flip availability
//!
//! # Settings
//! GET    /api/settings                         - Stored and effective settings
//! PUT    /api/settings/{key}                   - Upsert one setting
//!
//! # Orders
//! GET    /api/orders                           - List (?status=&payment_status=&page=)
//! GET    /api/orders/{id}                      - Detail with items
//! PUT    /api/orders/{id}/status               - Update fulfilment status
//!
//! # Roles
//! GET    /api/roles                            - All assignments
//! POST   /api/roles                            - Grant a role by email
//! DELETE /api/roles/{user_id}/{role}           - Revoke a role
//! ```

pub mod auth;
pub mod metadata;
pub mod options;
pub mod orders;
pub mod products;
pub mod roles;
pub mod settings;

use axum::{Json, Router};
use serde::Serialize;

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

/// Empty payload for responses that only report success.
#[derive(Debug, Serialize)]
pub struct Done {}

/// A page of results with the total matching count.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub items: T,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(metadata::router())
        .merge(options::router())
        .merge(settings::router())
        .merge(orders::router())
        .merge(roles::router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Products {
        products: Vec<u32>,
    }

    #[test]
    fn test_page_envelope_flattens() {
        let Json(body) = ok(Page {
            items: Products {
                products: vec![1, 2],
            },
            total: 12,
            page: 1,
            per_page: 2,
        });
        let value = serde_json::to_value(body).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "success": true,
                "products": [1, 2],
                "total": 12,
                "page": 1,
                "per_page": 2,
            })
        );
    }

    #[test]
    fn test_done_is_bare_success() {
        let Json(body) = ok(Done {});
        let value = serde_json::to_value(body).expect("serialize");
        assert_eq!(value, serde_json::json!({ "success": true }));
    }
}
