//! User lookups and role grants.

use sqlx::PgPool;
use tracing::instrument;

use frameshop_core::{AppRole, Email, UserId};

use super::RepositoryError;
use crate::models::{AdminUser, RoleAssignment};

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: UserId,
    email: String,
    password_hash: String,
}

/// Repository for `shop.user` and `shop.user_role`.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, email, password_hash FROM shop.user WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let email = Email::parse(&r.email).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;
            Ok((AdminUser { id: r.id, email }, r.password_hash))
        })
        .transpose()
    }

    /// Whether the user holds `role`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_role(&self, user_id: UserId, role: AppRole) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM shop.user_role WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Every role assignment, admins first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_roles(&self) -> Result<Vec<RoleAssignment>, RepositoryError> {
        let roles = sqlx::query_as::<_, RoleAssignment>(
            r"
            SELECT r.user_id, u.email, r.role, r.created_at
            FROM shop.user_role r
            JOIN shop.user u ON u.id = r.user_id
            ORDER BY r.role, u.email
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(roles)
    }

    /// Grant `role` to the user with `email`. Granting a held role is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has that email.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn grant_role(
        &self,
        email: &Email,
        role: AppRole,
    ) -> Result<RoleAssignment, RepositoryError> {
        let user_id: UserId = sqlx::query_scalar("SELECT id FROM shop.user WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        sqlx::query(
            r"
            INSERT INTO shop.user_role (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(role)
        .execute(self.pool)
        .await?;

        let assignment = sqlx::query_as::<_, RoleAssignment>(
            r"
            SELECT r.user_id, u.email, r.role, r.created_at
            FROM shop.user_role r
            JOIN shop.user u ON u.id = r.user_id
            WHERE r.user_id = $1 AND r.role = $2
            ",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(self.pool)
        .await?;

        Ok(assignment)
    }

    /// Revoke `role` from a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user did not hold the role.
    #[instrument(skip(self))]
    pub async fn revoke_role(&self, user_id: UserId, role: AppRole) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.user_role WHERE user_id = $1 AND role = $2")
            .bind(user_id)
            .bind(role)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
