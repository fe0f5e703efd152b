//! Store settings queries.

use sqlx::PgPool;

use frameshop_core::StoreSettings;

use super::RepositoryError;

/// Repository for the `shop.setting` key/value table.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load effective settings. Missing or invalid rows fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(&self) -> Result<StoreSettings, RepositoryError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM shop.setting")
            .fetch_all(self.pool)
            .await?;

        Ok(StoreSettings::from_pairs(rows))
    }
}
