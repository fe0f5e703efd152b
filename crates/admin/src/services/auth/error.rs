use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Unknown email, wrong password or unparseable email
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Right password, but the account lacks the `admin` role
    #[error("admin role required")]
    NotAdmin,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
