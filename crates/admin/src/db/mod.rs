//! Database operations for the admin API.
//!
//! The admin binary works on the same `shop` schema as the storefront; the
//! migrations in `crates/storefront/migrations/` own its shape.
//!
//! ```bash
//! cargo run -p frameshop-cli -- migrate
//! ```

pub mod options;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use options::{FrameStyleDraft, OptionsRepository, SizeDraft};
pub use orders::{OrderFilter, OrderRepository};
pub use products::{ProductDraft, ProductRepository};
pub use settings::{SettingEntry, SettingsRepository};
pub use users::UserRepository;

/// Repository failure, mapped to a status code by the API error type.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row failed to convert into a domain type
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    /// Unique constraint hit (duplicate slug)
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(message: &str) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    let message = message.to_owned();
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(message);
        }
        RepositoryError::Database(e)
    }
}

/// Default page size for admin listings.
pub const DEFAULT_PER_PAGE: u32 = 50;
/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 200;

/// Page selection for listings, taken from the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
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

    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// The admin sees little traffic, so the pool is smaller than the
/// storefront's.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// True when the database answers a trivial query.
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page = Pagination::default();
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps() {
        let page = Pagination {
            page: Some(4),
            per_page: Some(1000),
        };
        assert_eq!(page.per_page(), MAX_PER_PAGE);
        assert_eq!(page.offset(), 600);

        let page = Pagination {
            page: Some(0),
            per_page: Some(0),
        };
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 1);
    }
}
