//! Frame style and print size management.
//!
//! Unlike the storefront, the admin sees unavailable options too.

use sqlx::PgPool;
use tracing::instrument;

use frameshop_core::{FrameStyle, FrameStyleId, Money, SizeOption, SizeOptionId};

use super::{RepositoryError, conflict_on_unique};

/// Validated frame style fields.
#[derive(Debug, Clone)]
pub struct FrameStyleDraft {
    pub name: String,
    pub price: Money,
    pub preview: String,
    pub is_available: bool,
}

/// Validated size fields.
#[derive(Debug, Clone)]
pub struct SizeDraft {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub price: Money,
    pub is_available: bool,
}

/// Repository for `shop.frame_style` and `shop.size_option`.
pub struct OptionsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OptionsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Frame styles
    // =========================================================================

    /// All frame styles, including unavailable ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_frame_styles(&self) -> Result<Vec<FrameStyle>, RepositoryError> {
        let styles = sqlx::query_as::<_, FrameStyle>(
            "SELECT id, name, price, preview, is_available FROM shop.frame_style ORDER BY price, name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(styles)
    }

    /// Insert a frame style.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_frame_style(
        &self,
        draft: &FrameStyleDraft,
    ) -> Result<FrameStyle, RepositoryError> {
        sqlx::query_as::<_, FrameStyle>(
            r"
            INSERT INTO shop.frame_style (name, price, preview, is_available)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, preview, is_available
            ",
        )
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.preview)
        .bind(draft.is_available)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("a frame style with this name already exists"))
    }

    /// Replace a frame style's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the style does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    #[instrument(skip(self, draft))]
    pub async fn update_frame_style(
        &self,
        id: FrameStyleId,
        draft: &FrameStyleDraft,
    ) -> Result<FrameStyle, RepositoryError> {
        sqlx::query_as::<_, FrameStyle>(
            r"
            UPDATE shop.frame_style
            SET name = $2, price = $3, preview = $4, is_available = $5
            WHERE id = $1
            RETURNING id, name, price, preview, is_available
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.preview)
        .bind(draft.is_available)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("a frame style with this name already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Flip a frame style's availability.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the style does not exist.
    #[instrument(skip(self))]
    pub async fn toggle_frame_style(&self, id: FrameStyleId) -> Result<FrameStyle, RepositoryError> {
        sqlx::query_as::<_, FrameStyle>(
            r"
            UPDATE shop.frame_style
            SET is_available = NOT is_available
            WHERE id = $1
            RETURNING id, name, price, preview, is_available
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a frame style. Order items keep the style name as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the style does not exist.
    #[instrument(skip(self))]
    pub async fn delete_frame_style(&self, id: FrameStyleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.frame_style WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    /// All sizes, including unavailable ones, smallest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sizes(&self) -> Result<Vec<SizeOption>, RepositoryError> {
        let sizes = sqlx::query_as::<_, SizeOption>(
            r"
            SELECT id, name, width, height, price, is_available
            FROM shop.size_option
            ORDER BY width * height, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(sizes)
    }

    /// Insert a size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_size(&self, draft: &SizeDraft) -> Result<SizeOption, RepositoryError> {
        sqlx::query_as::<_, SizeOption>(
            r"
            INSERT INTO shop.size_option (name, width, height, price, is_available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, width, height, price, is_available
            ",
        )
        .bind(&draft.name)
        .bind(draft.width)
        .bind(draft.height)
        .bind(draft.price)
        .bind(draft.is_available)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("a size with this name already exists"))
    }

    /// Replace a size's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    #[instrument(skip(self, draft))]
    pub async fn update_size(
        &self,
        id: SizeOptionId,
        draft: &SizeDraft,
    ) -> Result<SizeOption, RepositoryError> {
        sqlx::query_as::<_, SizeOption>(
            r"
            UPDATE shop.size_option
            SET name = $2, width = $3, height = $4, price = $5, is_available = $6
            WHERE id = $1
            RETURNING id, name, width, height, price, is_available
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.width)
        .bind(draft.height)
        .bind(draft.price)
        .bind(draft.is_available)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("a size with this name already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Flip a size's availability.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size does not exist.
    #[instrument(skip(self))]
    pub async fn toggle_size(&self, id: SizeOptionId) -> Result<SizeOption, RepositoryError> {
        sqlx::query_as::<_, SizeOption>(
            r"
            UPDATE shop.size_option
            SET is_available = NOT is_available
            WHERE id = $1
            RETURNING id, name, width, height, price, is_available
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size does not exist.
    #[instrument(skip(self))]
    pub async fn delete_size(&self, id: SizeOptionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.size_option WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
