//! Store settings database operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use frameshop_core::SettingKey;

use super::RepositoryError;

/// A stored setting row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the `shop.setting` key/value table.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All stored settings, by key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SettingEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, SettingEntry>(
            "SELECT key, value, updated_at FROM shop.setting ORDER BY key",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Insert or replace a setting. `value` must already be normalized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, key: SettingKey, value: &str) -> Result<SettingEntry, RepositoryError> {
        let entry = sqlx::query_as::<_, SettingEntry>(
            r"
            INSERT INTO shop.setting (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING key, value, updated_at
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }
}
