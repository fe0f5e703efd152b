//! Customer account errors.

use thiserror::Error;

use frameshop_core::ContactError;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ContactError),

    /// Unknown email or wrong password. The two are not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("password hashing failed")]
    PasswordHash,
}
