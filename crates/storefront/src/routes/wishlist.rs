//! Wishlist route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frameshop_core::{
    FrameStyleId, PaymentMethod, Product, ProductId, ProductSummary, SizeOptionId, Wishlist,
    WishlistItem,
};

use super::cart::{CartView, build_cart_item, load_cart, save_cart};
use super::{Success, ok};
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::{load_session_value, store_session_value};
use crate::models::session_keys;
use crate::state::AppState;

/// Build the wishlist router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/wishlist", get(show).post(add))
        .route("/api/wishlist/toggle", post(toggle))
        .route("/api/wishlist/{product_id}", delete(remove))
        .route("/api/wishlist/{product_id}/move-to-cart", post(move_to_cart))
}

#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<WishlistItem>,
    pub count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().to_vec(),
            count: wishlist.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishlistChange {
    /// Whether the product is in the wishlist after the call.
    pub wishlisted: bool,
    #[serde(flatten)]
    pub wishlist: WishlistView,
}

#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

async fn load_wishlist(session: &Session) -> Result<Wishlist> {
    Ok(load_session_value(session, session_keys::WISHLIST).await?)
}

async fn save_wishlist(session: &Session, wishlist: &Wishlist) -> Result<()> {
    Ok(store_session_value(session, session_keys::WISHLIST, wishlist).await?)
}

async fn find_product(state: &AppState, id: ProductId) -> Result<Product> {
    CatalogRepository::new(state.pool())
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Show the wishlist, newest first.
pub async fn show(session: Session) -> Result<Json<Success<WishlistView>>> {
    let wishlist = load_wishlist(&session).await?;
    Ok(ok(WishlistView::from(&wishlist)))
}

/// Add a product. Adding a product already present is a no-op.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<WishlistRequest>,
) -> Result<Json<Success<WishlistChange>>> {
    let product = find_product(&state, body.product_id).await?;

    let mut wishlist = load_wishlist(&session).await?;
    if wishlist.add(ProductSummary::from(&product), Utc::now()) {
        save_wishlist(&session, &wishlist).await?;
    }

    Ok(ok(WishlistChange {
        wishlisted: true,
        wishlist: WishlistView::from(&wishlist),
    }))
}

/// Add the product if absent, remove it if present.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<WishlistRequest>,
) -> Result<Json<Success<WishlistChange>>> {
    let mut wishlist = load_wishlist(&session).await?;

    // Removing needs no catalog lookup; the product may be gone already.
    let wishlisted = if wishlist.contains(body.product_id) {
        wishlist.remove(body.product_id);
        false
    } else {
        let product = find_product(&state, body.product_id).await?;
        wishlist.add(ProductSummary::from(&product), Utc::now())
    };
    save_wishlist(&session, &wishlist).await?;

    Ok(ok(WishlistChange {
        wishlisted,
        wishlist: WishlistView::from(&wishlist),
    }))
}

/// Remove a product.
pub async fn remove(
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Success<WishlistView>>> {
    let mut wishlist = load_wishlist(&session).await?;
    wishlist
        .remove(product_id)
        .ok_or_else(|| AppError::NotFound(format!("wishlist item {product_id}")))?;
    save_wishlist(&session, &wishlist).await?;

    Ok(ok(WishlistView::from(&wishlist)))
}

/// Options for moving a wishlist item into the cart.
#[derive(Debug, Default, Deserialize)]
pub struct MoveToCartRequest {
    pub frame_style_id: Option<FrameStyleId>,
    pub size_id: Option<SizeOptionId>,
}

#[derive(Debug, Serialize)]
pub struct MoveToCartResponse {
    pub wishlist: WishlistView,
    pub cart: CartView,
}

/// Add one unit of a wishlisted product to the cart and drop it from the
/// wishlist.
#[instrument(skip(state, session, body))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
    body: Option<Json<MoveToCartRequest>>,
) -> Result<Json<Success<MoveToCartResponse>>> {
    let Json(options) = body.unwrap_or_default();

    let mut wishlist = load_wishlist(&session).await?;
    if !wishlist.contains(product_id) {
        return Err(AppError::NotFound(format!("wishlist item {product_id}")));
    }

    let product = find_product(&state, product_id).await?;
    let item = build_cart_item(
        &state,
        &product,
        options.frame_style_id,
        options.size_id,
        1,
    )
    .await?;

    let mut cart = load_cart(&session).await?;
    cart.add(item)?;
    wishlist.remove(product_id);

    save_cart(&session, &cart).await?;
    save_wishlist(&session, &wishlist).await?;

    let settings = state.catalog().settings(state.pool()).await?;

    Ok(ok(MoveToCartResponse {
        wishlist: WishlistView::from(&wishlist),
        cart: CartView::new(&cart, PaymentMethod::Online, &settings),
    }))
}

#[cfg(test)]
mod tests {
    use frameshop_core::Money;

    use super::*;

    fn summary(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            slug: format!("print-{id}"),
            title: format!("Print {id}"),
            price: Money::from_rupees(300),
            category: "prints".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_wishlist_view_counts_items() {
        let mut wishlist = Wishlist::new();
        wishlist.add(summary(1), Utc::now());
        wishlist.add(summary(1), Utc::now());
        wishlist.add(summary(2), Utc::now());

        let view = WishlistView::from(&wishlist);
        assert_eq!(view.count, 2);
    }

    #[test]
    fn test_change_serializes_flat() {
        let wishlist = Wishlist::new();
        let change = WishlistChange {
            wishlisted: false,
            wishlist: WishlistView::from(&wishlist),
        };
        let value = serde_json::to_value(&change).expect("serialize");
        assert_eq!(value["wishlisted"], false);
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn test_move_options_are_optional() {
        let options: MoveToCartRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(options.frame_style_id.is_none());
        assert!(options.size_id.is_none());
    }
}
