//! Store settings commands.
//!
//! ```bash
//! fs-cli settings seed
//! ```

use frameshop_core::SettingKey;

use super::{CommandError, connect};

/// Insert the default value of every setting that has no row yet.
///
/// Existing values are never overwritten, so this is safe to re-run.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn seed() -> Result<(), CommandError> {
    let pool = connect().await?;

    let mut inserted = 0_u64;
    for key in SettingKey::ALL {
        let result = sqlx::query(
            r"
            INSERT INTO shop.setting (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            ",
        )
        .bind(key.as_str())
        .bind(key.default_value())
        .execute(&pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(key = %key, value = %key.default_value(), "Seeded setting");
            inserted += result.rows_affected();
        }
    }

    tracing::info!(inserted, total = SettingKey::ALL.len(), "Settings seed complete");
    Ok(())
}
