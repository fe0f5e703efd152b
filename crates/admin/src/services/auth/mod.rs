//! Admin sign-in.
//!
//! Admins use their storefront email and password. Only users holding
//! [`AppRole::Admin`] get a session.

mod error;

pub use error::AdminAuthError;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use sqlx::PgPool;

use frameshop_core::{AppRole, Email};

use crate::db::UserRepository;
use crate::models::AdminUser;

pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// The role is looked up only once the password matches, so a wrong
    /// password reveals nothing about the account's roles.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for a bad email or password, `NotAdmin` for a
    /// valid customer without the role.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AdminAuthError::InvalidCredentials);
        };

        let Some((user, stored)) = self.users.get_credentials(&email).await? else {
            return Err(AdminAuthError::InvalidCredentials);
        };
        if !password_matches(password, &stored) {
            return Err(AdminAuthError::InvalidCredentials);
        }

        if self.users.has_role(user.id, AppRole::Admin).await? {
            Ok(user)
        } else {
            Err(AdminAuthError::NotAdmin)
        }
    }
}

/// A stored value that is not a PHC string never matches.
fn password_matches(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|phc| {
        Argon2::default()
            .verify_password(password.as_bytes(), &phc)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use argon2::PasswordHasher;
    use argon2::password_hash::{SaltString, rand_core::OsRng};

    use super::*;

    fn stored(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("hash")
            .to_string()
    }

    #[test]
    fn test_password_matches() {
        let phc = stored("frames-and-more");
        assert!(password_matches("frames-and-more", &phc));
        assert!(!password_matches("frames-and-less", &phc));
    }

    #[test]
    fn test_plain_text_column_never_matches() {
        assert!(!password_matches("plain-text", "plain-text"));
    }
}
