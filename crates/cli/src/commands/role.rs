//! Role management commands.
//!
//! ```bash
//! # Let an existing account into the admin API
//! fs-cli role grant -e owner@example.com -r admin
//!
//! # Take it away again
//! fs-cli role revoke -e owner@example.com -r admin
//! ```
//!
//! The account must already exist; register it on the storefront first.
//! This is how the first admin is created, since granting roles through the
//! admin API needs an admin.

use frameshop_admin::db::{RepositoryError, UserRepository};
use frameshop_core::{AppRole, Email};

use super::{CommandError, connect};

fn parse_email(email: &str) -> Result<Email, CommandError> {
    Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))
}

/// Grant `role` to the account with `email`.
///
/// # Errors
///
/// Returns an error if the email is invalid, no account has it, or the
/// database is unreachable.
pub async fn grant(email: &str, role: AppRole) -> Result<(), CommandError> {
    let email = parse_email(email)?;
    let pool = connect().await?;

    let assignment = UserRepository::new(&pool)
        .grant_role(&email, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CommandError::UserNotFound(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        user_id = %assignment.user_id,
        email = %assignment.email,
        role = %assignment.role,
        "Role granted"
    );
    Ok(())
}

/// Revoke `role` from the account with `email`.
///
/// Revoking a role the account does not hold is reported but not an error.
///
/// # Errors
///
/// Returns an error if the email is invalid, no account has it, or the
/// database is unreachable.
pub async fn revoke(email: &str, role: AppRole) -> Result<(), CommandError> {
    let email = parse_email(email)?;
    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    let (user, _) = users
        .get_credentials(&email)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(email.to_string()))?;

    match users.revoke_role(user.id, role).await {
        Ok(()) => tracing::info!(user_id = %user.id, %role, "Role revoked"),
        Err(RepositoryError::NotFound) => {
            tracing::warn!(user_id = %user.id, %role, "User did not hold this role");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
