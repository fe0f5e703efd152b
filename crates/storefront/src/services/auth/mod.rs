//! Customer sign-up and sign-in.
//!
//! Passwords are stored as Argon2id hashes. A failed sign-in never says
//! whether the email exists.

mod error;
mod password;

pub use error::AuthError;

use sqlx::PgPool;

use frameshop_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Open an account holding the `user` role.
    ///
    /// # Errors
    ///
    /// `InvalidEmail` or `PasswordLength` for bad input, `EmailTaken` when
    /// the address is registered already.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        password::check_length(password)?;
        let stored = password::hash(password)?;

        match self.users.insert(&email, &stored).await {
            Err(RepositoryError::Conflict(_)) => Err(AuthError::EmailTaken),
            other => Ok(other?),
        }
    }

    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email, a wrong password or a
    /// malformed email.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        match self.users.find_credentials(&email).await? {
            Some((user, stored)) if password::matches(password, &stored) => Ok(user),
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                password::verify_decoy(password);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
