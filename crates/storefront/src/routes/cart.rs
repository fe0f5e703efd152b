//! Cart route handlers.
//!
//! The cart lives in the session under the `cart` key. Prices are captured
//! when a line is added: product price plus frame style and size surcharges.
//! Line IDs in paths use the `p{product}-f{frame}-s{size}` form.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frameshop_core::{
    Cart, CartItem, CartLineId, CheckoutQuote, FrameStyleId, Money, PaymentMethod, Product,
    ProductId, SizeOptionId,
};

use super::{Success, ok};
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::{load_session_value, store_session_value};
use crate::models::session_keys;
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(show).delete(clear))
        .route("/api/cart/count", get(count))
        .route("/api/cart/items", post(add))
        .route("/api/cart/items/{line_id}", put(set_quantity).delete(remove))
        .route("/api/cart/items/{line_id}/decrement", post(decrement))
}

// =============================================================================
// Views
// =============================================================================

/// A cart line as returned to the client.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub line_id: String,
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Money,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            line_id: item.line_id().to_string(),
            item: item.clone(),
            line_total: item.line_total(),
        }
    }
}

/// The cart with its price breakdown.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub payment_method: PaymentMethod,
    pub quote: CheckoutQuote,
}

impl CartView {
    pub fn new(
        cart: &Cart,
        payment_method: PaymentMethod,
        settings: &frameshop_core::StoreSettings,
    ) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            payment_method,
            quote: CheckoutQuote::compute(cart, payment_method, settings),
        }
    }
}

/// `?payment_method=cod|online`, defaulting to online.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentMethodQuery {
    pub payment_method: Option<PaymentMethod>,
}

impl PaymentMethodQuery {
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        self.payment_method.unwrap_or(PaymentMethod::Online)
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(load_session_value(session, session_keys::CART).await?)
}

pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    Ok(store_session_value(session, session_keys::CART, cart).await?)
}

async fn cart_view(state: &AppState, cart: &Cart, method: PaymentMethod) -> Result<CartView> {
    let settings = state.catalog().settings(state.pool()).await?;
    Ok(CartView::new(cart, method, &settings))
}

fn parse_line_id(raw: &str) -> Result<CartLineId> {
    Ok(raw.parse::<CartLineId>()?)
}

/// Price a cart line from the current catalog.
///
/// Unavailable frame styles or sizes are rejected rather than silently
/// dropped.
pub(crate) async fn build_cart_item(
    state: &AppState,
    product: &Product,
    frame_style_id: Option<FrameStyleId>,
    size_id: Option<SizeOptionId>,
    quantity: u32,
) -> Result<CartItem> {
    let repo = CatalogRepository::new(state.pool());

    let frame_style = match frame_style_id {
        Some(id) => Some(
            repo.get_available_frame_style(id)
                .await?
                .ok_or_else(|| AppError::BadRequest(format!("Frame style {id} is unavailable")))?,
        ),
        None => None,
    };
    let size = match size_id {
        Some(id) => Some(
            repo.get_available_size(id)
                .await?
                .ok_or_else(|| AppError::BadRequest(format!("Size {id} is unavailable")))?,
        ),
        None => None,
    };

    let unit_price = product.price
        + frame_style.as_ref().map_or(Money::ZERO, |f| f.price)
        + size.as_ref().map_or(Money::ZERO, |s| s.price);

    Ok(CartItem {
        product_id: product.id,
        slug: product.slug.clone(),
        title: product.title.clone(),
        category: product.category.clone(),
        image: product.cover_image().map(String::from),
        frame_style_id,
        frame_style_name: frame_style.map(|f| f.name),
        size_id,
        size_name: size.map(|s| s.label()),
        unit_price,
        quantity,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart with a quote for the chosen payment method.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PaymentMethodQuery>,
) -> Result<Json<Success<CartView>>> {
    let cart = load_cart(&session).await?;
    Ok(ok(cart_view(&state, &cart, query.method()).await?))
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub frame_style_id: Option<FrameStyleId>,
    pub size_id: Option<SizeOptionId>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Add a line, or increase the quantity of a matching line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Success<CartView>>> {
    let product = CatalogRepository::new(state.pool())
        .get_product(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let item = build_cart_item(
        &state,
        &product,
        body.frame_style_id,
        body.size_id,
        body.quantity,
    )
    .await?;

    let mut cart = load_cart(&session).await?;
    cart.add(item)?;
    save_cart(&session, &cart).await?;

    tracing::debug!(product_id = %body.product_id, "Added to cart");

    Ok(ok(cart_view(&state, &cart, PaymentMethod::Online).await?))
}

/// Set quantity request body.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

/// Set a line's quantity. Zero removes the line.
pub async fn set_quantity(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<Success<CartView>>> {
    let line_id = parse_line_id(&line_id)?;

    let mut cart = load_cart(&session).await?;
    cart.set_quantity(line_id, body.quantity)?;
    save_cart(&session, &cart).await?;

    Ok(ok(cart_view(&state, &cart, PaymentMethod::Online).await?))
}

/// Remove one unit. The last unit removes the line.
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
) -> Result<Json<Success<CartView>>> {
    let line_id = parse_line_id(&line_id)?;

    let mut cart = load_cart(&session).await?;
    cart.decrement(line_id)?;
    save_cart(&session, &cart).await?;

    Ok(ok(cart_view(&state, &cart, PaymentMethod::Online).await?))
}

/// Remove a line.
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
) -> Result<Json<Success<CartView>>> {
    let line_id = parse_line_id(&line_id)?;

    let mut cart = load_cart(&session).await?;
    cart.remove(line_id)
        .ok_or(frameshop_core::CartError::LineNotFound(line_id))?;
    save_cart(&session, &cart).await?;

    Ok(ok(cart_view(&state, &cart, PaymentMethod::Online).await?))
}

/// Empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Success<CartView>>> {
    let cart = Cart::new();
    save_cart(&session, &cart).await?;
    Ok(ok(cart_view(&state, &cart, PaymentMethod::Online).await?))
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Total units in the cart.
pub async fn count(session: Session) -> Result<Json<Success<CartCount>>> {
    let cart = load_cart(&session).await?;
    Ok(ok(CartCount {
        count: cart.item_count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(4),
            slug: "lotus".to_string(),
            title: "Lotus".to_string(),
            category: "Frames".to_string(),
            image: None,
            frame_style_id: Some(FrameStyleId::new(2)),
            frame_style_name: Some("Teak".to_string()),
            size_id: None,
            size_name: None,
            unit_price: Money::from_rupees(450),
            quantity,
        }
    }

    #[test]
    fn test_cart_line_view_fields() {
        let view = CartLineView::from(&item(2));
        let value = serde_json::to_value(&view).expect("serialize");

        assert_eq!(value["line_id"], "p4-f2-s0");
        assert_eq!(value["title"], "Lotus");
        assert_eq!(view.line_total, Money::from_rupees(900));
    }

    #[test]
    fn test_cart_view_quotes_cod() {
        let mut cart = Cart::new();
        cart.add(item(1)).expect("add");
        let settings = frameshop_core::StoreSettings::default();

        let view = CartView::new(&cart, PaymentMethod::Cod, &settings);
        assert_eq!(view.quote.cod_fee, Money::from_rupees(49));
        assert_eq!(view.quote.shipping, Money::from_rupees(99));
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn test_payment_method_defaults_to_online() {
        assert_eq!(PaymentMethodQuery::default().method(), PaymentMethod::Online);
    }

    #[test]
    fn test_add_request_defaults_quantity() {
        let body: AddToCartRequest =
            serde_json::from_str(r#"{"product_id": 9}"#).expect("deserialize");
        assert_eq!(body.quantity, 1);
        assert!(body.frame_style_id.is_none());
    }

    #[test]
    fn test_bad_line_id_is_rejected() {
        assert!(parse_line_id("garbage").is_err());
        assert!(parse_line_id("p4-f2-s0").is_ok());
    }
}
