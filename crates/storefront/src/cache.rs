//! In-process cache for catalog reads.
//!
//! Products, frame styles, sizes, categories and store settings are cached
//! with `moka` (5-minute TTL). Product listings with a search term are never
//! cached.

use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use frameshop_core::{FrameStyle, Product, SizeOption, StoreSettings};

use crate::db::{CatalogRepository, RepositoryError, SettingsRepository};

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1000;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Categories,
    FrameStyles,
    Sizes,
    Settings,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Categories(Vec<String>),
    FrameStyles(Vec<FrameStyle>),
    Sizes(Vec<SizeOption>),
    Settings(StoreSettings),
}

/// Read-through cache over the catalog and settings tables.
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self { cache }
    }

    /// Get a product by slug. Missing products are not cached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product(
        &self,
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let key = CacheKey::Product(slug.to_owned());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!(slug, "Cache hit for product");
            return Ok(Some(*product));
        }

        let product = CatalogRepository::new(pool).get_product_by_slug(slug).await?;
        if let Some(product) = &product {
            self.cache
                .insert(key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }

    /// Distinct product categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self, pool: &PgPool) -> Result<Vec<String>, RepositoryError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache.get(&CacheKey::Categories).await
        {
            return Ok(categories);
        }

        let categories = CatalogRepository::new(pool).list_categories().await?;
        self.cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Frame styles currently on offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn frame_styles(&self, pool: &PgPool) -> Result<Vec<FrameStyle>, RepositoryError> {
        if let Some(CacheValue::FrameStyles(styles)) = self.cache.get(&CacheKey::FrameStyles).await
        {
            return Ok(styles);
        }

        let styles = CatalogRepository::new(pool)
            .list_available_frame_styles()
            .await?;
        self.cache
            .insert(CacheKey::FrameStyles, CacheValue::FrameStyles(styles.clone()))
            .await;

        Ok(styles)
    }

    /// Print sizes currently on offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sizes(&self, pool: &PgPool) -> Result<Vec<SizeOption>, RepositoryError> {
        if let Some(CacheValue::Sizes(sizes)) = self.cache.get(&CacheKey::Sizes).await {
            return Ok(sizes);
        }

        let sizes = CatalogRepository::new(pool).list_available_sizes().await?;
        self.cache
            .insert(CacheKey::Sizes, CacheValue::Sizes(sizes.clone()))
            .await;

        Ok(sizes)
    }

    /// Effective store settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn settings(&self, pool: &PgPool) -> Result<StoreSettings, RepositoryError> {
        if let Some(CacheValue::Settings(settings)) = self.cache.get(&CacheKey::Settings).await {
            debug!("Cache hit for settings");
            return Ok(settings);
        }

        let settings = SettingsRepository::new(pool).load().await?;
        self.cache
            .insert(CacheKey::Settings, CacheValue::Settings(settings.clone()))
            .await;

        Ok(settings)
    }
}
