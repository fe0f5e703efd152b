//! Command implementations.
//!
//! Every command talks to the shared `shop` database. The URL comes from
//! `DATABASE_URL`, falling back to `STOREFRONT_DATABASE_URL`.

pub mod migrate;
pub mod role;
pub mod settings;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] frameshop_admin::db::RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No account with this email.
    #[error("No user with email: {0}")]
    UserNotFound(String),
}

fn database_url() -> Result<SecretString, CommandError> {
    std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("STOREFRONT_DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))
}

/// Connect to the shop database.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(url.expose_secret()).await?)
}
