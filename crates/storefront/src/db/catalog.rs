//! Read-only catalog queries: products, frame styles and sizes.

use sqlx::PgPool;

use frameshop_core::{FrameStyle, FrameStyleId, Product, ProductId, SizeOption, SizeOptionId};

use super::RepositoryError;

/// Default page size for product listings.
pub const DEFAULT_PER_PAGE: u32 = 24;
/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Filters and pagination for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductQuery {
    /// 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }

    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// `ILIKE` pattern for the title search, with wildcards escaped.
    fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, slug, description, price, category, images,
                   created_at, updated_at
            FROM shop.product
            WHERE ($1::text IS NULL OR lower(category) = lower($1))
              AND ($2::text IS NULL OR title ILIKE $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(query.category())
        .bind(query.search_pattern())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Count products matching the listing filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_products(&self, query: &ProductQuery) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM shop.product
            WHERE ($1::text IS NULL OR lower(category) = lower($1))
              AND ($2::text IS NULL OR title ILIKE $2)
            ",
        )
        .bind(query.category())
        .bind(query.search_pattern())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, slug, description, price, category, images,
                   created_at, updated_at
            FROM shop.product
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
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

    /// Distinct product categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM shop.product ORDER BY category",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Frame styles currently offered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available_frame_styles(&self) -> Result<Vec<FrameStyle>, RepositoryError> {
        let styles = sqlx::query_as::<_, FrameStyle>(
            r"
            SELECT id, name, price, preview, is_available
            FROM shop.frame_style
            WHERE is_available
            ORDER BY price, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(styles)
    }

    /// Sizes currently offered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available_sizes(&self) -> Result<Vec<SizeOption>, RepositoryError> {
        let sizes = sqlx::query_as::<_, SizeOption>(
            r"
            SELECT id, name, width, height, price, is_available
            FROM shop.size_option
            WHERE is_available
            ORDER BY width * height, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(sizes)
    }

    /// Get an available frame style.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available_frame_style(
        &self,
        id: FrameStyleId,
    ) -> Result<Option<FrameStyle>, RepositoryError> {
        let style = sqlx::query_as::<_, FrameStyle>(
            r"
            SELECT id, name, price, preview, is_available
            FROM shop.frame_style
            WHERE id = $1 AND is_available
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(style)
    }

    /// Get an available size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available_size(
        &self,
        id: SizeOptionId,
    ) -> Result<Option<SizeOption>, RepositoryError> {
        let size = sqlx::query_as::<_, SizeOption>(
            r"
            SELECT id, name, width, height, price, is_available
            FROM shop.size_option
            WHERE id = $1 AND is_available
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(size)
    }
}
