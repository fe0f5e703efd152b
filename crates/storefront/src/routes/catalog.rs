//! Catalog route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frameshop_core::{
    FrameStyle, Money, Product, ProductSummary, RecentlyViewed, SizeOption, StoreSettings,
};

use super::{Success, ok};
use crate::db::CatalogRepository;
use crate::db::catalog::ProductQuery;
use crate::error::{AppError, Result};
use crate::middleware::{load_session_value, store_session_value};
use crate::models::session_keys;
use crate::state::AppState;

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{slug}", get(show_product))
        .route("/api/categories", get(categories))
        .route("/api/frame-styles", get(frame_styles))
        .route("/api/sizes", get(sizes))
        .route("/api/settings", get(settings))
        .route("/api/recently-viewed", get(recently_viewed))
}

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<ListProductsQuery> for ProductQuery {
    fn from(q: ListProductsQuery) -> Self {
        Self {
            category: q.category,
            search: q.search,
            page: q.page,
            per_page: q.per_page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// List products.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Success<ProductList>>> {
    let query = ProductQuery::from(query);
    let repo = CatalogRepository::new(state.pool());

    let products = repo.list_products(&query).await?;
    let total = repo.count_products(&query).await?;

    Ok(ok(ProductList {
        products,
        page: query.page(),
        per_page: query.per_page(),
        total,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    /// Frame and size options, only offered for frame-category products.
    pub frame_styles: Vec<FrameStyle>,
    pub sizes: Vec<SizeOption>,
    /// Other recently viewed products.
    pub recently_viewed: Vec<ProductSummary>,
}

/// Show a product and record it as recently viewed.
#[instrument(skip(state, session))]
pub async fn show_product(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<Success<ProductDetail>>> {
    let product = state
        .catalog()
        .product(state.pool(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let (frame_styles, sizes) = if product.is_frame() {
        (
            state.catalog().frame_styles(state.pool()).await?,
            state.catalog().sizes(state.pool()).await?,
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let mut history: RecentlyViewed =
        load_session_value(&session, session_keys::RECENTLY_VIEWED).await?;
    let others = history.excluding(product.id).cloned().collect();
    history.record(ProductSummary::from(&product));
    store_session_value(&session, session_keys::RECENTLY_VIEWED, &history).await?;

    Ok(ok(ProductDetail {
        product,
        frame_styles,
        sizes,
        recently_viewed: others,
    }))
}

#[derive(Debug, Serialize)]
pub struct Categories {
    pub categories: Vec<String>,
}

/// List distinct product categories.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Success<Categories>>> {
    let categories = state.catalog().categories(state.pool()).await?;
    Ok(ok(Categories { categories }))
}

#[derive(Debug, Serialize)]
pub struct FrameStyles {
    pub frame_styles: Vec<FrameStyle>,
}

/// List frame styles on offer.
pub async fn frame_styles(State(state): State<AppState>) -> Result<Json<Success<FrameStyles>>> {
    let frame_styles = state.catalog().frame_styles(state.pool()).await?;
    Ok(ok(FrameStyles { frame_styles }))
}

#[derive(Debug, Serialize)]
pub struct Sizes {
    pub sizes: Vec<SizeOption>,
}

/// List print sizes on offer.
pub async fn sizes(State(state): State<AppState>) -> Result<Json<Success<Sizes>>> {
    let sizes = state.catalog().sizes(state.pool()).await?;
    Ok(ok(Sizes { sizes }))
}

/// Public store settings shown at checkout.
#[derive(Debug, Serialize)]
pub struct PublicSettings {
    pub shipping_cost: Money,
    pub free_shipping_threshold: Money,
    pub cod_charge: Money,
    pub bulk_discount_amount: Money,
    pub bulk_discount_min_frames: u32,
}

impl From<StoreSettings> for PublicSettings {
    fn from(s: StoreSettings) -> Self {
        Self {
            shipping_cost: s.shipping_cost,
            free_shipping_threshold: s.free_shipping_threshold,
            cod_charge: s.cod_charge,
            bulk_discount_amount: s.bulk_discount_amount,
            bulk_discount_min_frames: s.bulk_discount_min_frames,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: PublicSettings,
}

/// Store settings.
pub async fn settings(State(state): State<AppState>) -> Result<Json<Success<SettingsResponse>>> {
    let settings = state.catalog().settings(state.pool()).await?;
    Ok(ok(SettingsResponse {
        settings: settings.into(),
    }))
}

#[derive(Debug, Serialize)]
pub struct RecentlyViewedResponse {
    pub products: Vec<ProductSummary>,
}

/// Recently viewed products, most recent first.
pub async fn recently_viewed(session: Session) -> Result<Json<Success<RecentlyViewedResponse>>> {
    let history: RecentlyViewed =
        load_session_value(&session, session_keys::RECENTLY_VIEWED).await?;
    Ok(ok(RecentlyViewedResponse {
        products: history.items().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_maps_to_product_query() {
        let query = ProductQuery::from(ListProductsQuery {
            category: Some("frames".to_string()),
            per_page: Some(500),
            ..ListProductsQuery::default()
        });
        assert_eq!(query.category.as_deref(), Some("frames"));
        assert_eq!(query.per_page(), 100);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_public_settings_from_defaults() {
        let settings = PublicSettings::from(StoreSettings::default());
        assert_eq!(settings.shipping_cost, Money::from_rupees(99));
        assert_eq!(settings.bulk_discount_min_frames, 5);
    }
}
