//! Product management route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use frameshop_core::catalog::slugify;
use frameshop_core::{Money, Product, ProductId};

use super::{Done, Page, Success, ok};
use crate::db::{Pagination, ProductDraft, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(show).put(update).delete(destroy),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
}

/// Product fields as submitted by the admin UI.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductInput {
    /// Trim and check the input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first invalid field.
    pub fn into_draft(self) -> Result<ProductDraft> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }

        let category = self.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(AppError::BadRequest("category is required".to_string()));
        }

        if self.price.is_negative() {
            return Err(AppError::BadRequest("price must not be negative".to_string()));
        }

        let slug = self
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| slugify(&title), slugify);
        if slug.is_empty() {
            return Err(AppError::BadRequest(
                "slug must contain letters or digits".to_string(),
            ));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let images = self
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        Ok(ProductDraft {
            title,
            slug,
            description,
            price: self.price,
            category,
            images,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// List products, newest first.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductQuery>, QueryRejection>,
    pagination: std::result::Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Success<Page<ProductList>>>> {
    let Query(query) = query?;
    let Query(pagination) = pagination?;
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let (products, total) = ProductRepository::new(state.pool())
        .list(search, pagination)
        .await?;

    Ok(ok(Page {
        items: ProductList { products },
        total,
        page: pagination.page(),
        per_page: pagination.per_page(),
    }))
}

/// Get one product.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Success<ProductResponse>>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ok(ProductResponse { product }))
}

/// Create a product.
#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Success<ProductResponse>>> {
    let Json(input) = payload?;
    let draft = input.into_draft()?;

    let product = ProductRepository::new(state.pool()).create(&draft).await?;
    tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");

    Ok(ok(ProductResponse { product }))
}

/// Replace a product's fields.
#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Success<ProductResponse>>> {
    let Json(input) = payload?;
    let draft = input.into_draft()?;

    let product = ProductRepository::new(state.pool())
        .update(id, &draft)
        .await?;
    tracing::info!(product_id = %product.id, "Product updated");

    Ok(ok(ProductResponse { product }))
}

/// Delete a product. Past orders keep their item snapshots.
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Success<Done>>> {
    ProductRepository::new(state.pool()).delete(id).await?;
    tracing::info!(product_id = %id, "Product deleted");

    Ok(ok(Done {}))
}
