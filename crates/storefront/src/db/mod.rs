//! Database operations for the shop `PostgreSQL` database.
//!
//! Everything lives in the `shop` schema, shared with the admin binary:
//!
//! ## Tables
//!
//! - `product`, `frame_style`, `size_option` - Catalog
//! - `setting` - Store settings (shipping, COD, bulk discount)
//! - `order`, `order_item` - Orders and their line snapshots
//! - `user`, `user_role` - Customer accounts and role grants
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p frameshop-cli -- migrate
//! ```

pub mod catalog;
pub mod orders;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use settings::SettingsRepository;
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

    /// Unique constraint hit (unique email)
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

/// Connect the storefront pool. Checkout holds a connection for the
/// length of its transaction, so the pool keeps a couple warm.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
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
