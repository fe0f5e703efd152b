//! Product catalog writes and admin listings.

use sqlx::PgPool;
use tracing::instrument;

use frameshop_core::{Money, Product, ProductId};

use super::{Pagination, RepositoryError, conflict_on_unique};

/// Validated product fields for insert or update.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    pub images: Vec<String>,
}

/// Repository for `shop.product`.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, optionally filtered by a title search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{escaped}%")
            });

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, slug, description, price, category, images,
                   created_at, updated_at
            FROM shop.product
            WHERE ($1::text IS NULL OR title ILIKE $1 OR slug ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(pattern.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shop.product WHERE ($1::text IS NULL OR title ILIKE $1 OR slug ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok((products, total))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, slug, description, price, category, images,
                   created_at, updated_at
            FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    #[instrument(skip(self, draft), fields(slug = %draft.slug))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            INSERT INTO shop.product (title, slug, description, price, category, images)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, slug, description, price, category, images,
                      created_at, updated_at
            ",
        )
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(draft.description.as_deref())
        .bind(draft.price)
        .bind(&draft.category)
        .bind(&draft.images)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("a product with this slug already exists"))
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new slug is taken.
    #[instrument(skip(self, draft), fields(slug = %draft.slug))]
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE shop.product
            SET title = $2, slug = $3, description = $4, price = $5,
                category = $6, images = $7
            WHERE id = $1
            RETURNING id, title, slug, description, price, category, images,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(draft.description.as_deref())
        .bind(draft.price)
        .bind(&draft.category)
        .bind(&draft.images)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("a product with this slug already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Past order lines keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
