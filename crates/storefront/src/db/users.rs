//! Customer account queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use frameshop_core::{AppRole, Email, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

const USER_COLUMNS: &str = "id, email, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("user {}: {e}", self.id))
        })?;
        Ok(User {
            id: self.id,
            email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The account for `email` with its stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is corrupt.
    pub async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS}, password_hash FROM shop.user WHERE email = $1");
        let Some(row) = sqlx::query_as::<_, CredentialRow>(&query)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some((row.user.into_user()?, row.password_hash)))
    }

    /// Insert an account and grant it the `user` role in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is registered.
    pub async fn insert(&self, email: &Email, password_hash: &str) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO shop.user (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email.as_str())
            .bind(password_hash)
            .fetch_one(&mut *tx)
            .await
            .map_err(conflict_on_unique("email already exists"))?;

        sqlx::query("INSERT INTO shop.user_role (user_id, role) VALUES ($1, $2)")
            .bind(row.id)
            .bind(AppRole::User)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        row.into_user()
    }
}
