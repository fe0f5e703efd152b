//! Argon2id password hashes in PHC string form.

use std::sync::LazyLock;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use super::AuthError;

pub const MIN_LEN: usize = 8;
/// Caps hashing cost per request
pub const MAX_LEN: usize = 128;

/// Verified against when the email is unknown, so both paths pay for a hash.
static DECOY: LazyLock<Option<String>> = LazyLock::new(|| hash("decoy-password").ok());

pub fn check_length(password: &str) -> Result<(), AuthError> {
    let chars = password.chars().count();
    if (MIN_LEN..=MAX_LEN).contains(&chars) {
        return Ok(());
    }
    Err(AuthError::PasswordLength {
        min: MIN_LEN,
        max: MAX_LEN,
    })
}

pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// A stored hash that does not parse counts as a mismatch.
pub fn matches(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|phc| {
        Argon2::default()
            .verify_password(password.as_bytes(), &phc)
            .is_ok()
    })
}

/// Burn one verification for an unknown account.
pub fn verify_decoy(password: &str) {
    if let Some(decoy) = DECOY.as_deref() {
        let _ = matches(password, decoy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            check_length("short"),
            Err(AuthError::PasswordLength { min: 8, .. })
        ));
        assert!(check_length("eight ch").is_ok());
        assert!(check_length(&"x".repeat(MAX_LEN + 1)).is_err());
        // Counted in characters, not bytes
        assert!(check_length("ग्राहकपासवर्ड").is_ok());
    }

    #[test]
    fn test_hash_then_match() {
        let stored = hash("correct horse battery").expect("hash");
        assert!(stored.starts_with("$argon2id$"));
        assert!(matches("correct horse battery", &stored));
        assert!(!matches("wrong horse battery", &stored));
    }

    #[test]
    fn test_unparseable_hash_never_matches() {
        assert!(!matches("anything", "not-a-phc-string"));
        assert!(!matches("", ""));
    }

    #[test]
    fn test_decoy_is_a_real_hash() {
        assert!(DECOY.as_deref().is_some_and(|d| d.starts_with("$argon2id$")));
        verify_decoy("whatever");
    }
}
