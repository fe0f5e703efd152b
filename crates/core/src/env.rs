//! Typed reads of configuration variables.
//!
//! [`EnvVars`] wraps a lookup function so server configs can be built from
//! the process environment in production and from a plain map in tests.
//! Blank values count as unset.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::secret::{SecretRules, WeakSecret};

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(String),

    #[error("Invalid environment variable {0}: {1}")]
    Invalid(String, String),

    #[error("Insecure secret in {0}: {1}")]
    Insecure(String, #[source] WeakSecret),
}

type Lookup = fn(&str) -> Option<String>;

fn process_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Configuration variables behind a lookup function.
pub struct EnvVars<F = Lookup> {
    lookup: F,
}

impl EnvVars {
    /// Read from the process environment.
    #[must_use]
    pub fn process() -> Self {
        Self {
            lookup: process_var,
        }
    }
}

impl<F> EnvVars<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub const fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// The trimmed value of `key`, if set and not blank.
    pub fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `key` is unset or blank.
    pub fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// The first of `keys` that is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first key if none are set.
    pub fn first_of(&self, keys: &[&str]) -> Result<String, ConfigError> {
        keys.iter()
            .find_map(|key| self.optional(key))
            .ok_or_else(|| ConfigError::Missing(keys.first().copied().unwrap_or_default().to_string()))
    }

    /// Parse `key` with [`FromStr`], or return `default` when unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the value does not parse.
    pub fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|e: T::Err| ConfigError::Invalid(key.to_string(), e.to_string()))
        })
    }

    /// Parse `key` (or `default` when unset) with a custom parser.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if unset without a default, or
    /// `ConfigError::Invalid` if `parse` fails.
    pub fn parsed_with<T, E>(
        &self,
        key: &str,
        default: Option<&str>,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, ConfigError>
    where
        E: Display,
    {
        let raw = match (self.optional(key), default) {
            (Some(raw), _) => raw,
            (None, Some(default)) => default.to_string(),
            (None, None) => return Err(ConfigError::Missing(key.to_string())),
        };
        parse(&raw).map_err(|e| ConfigError::Invalid(key.to_string(), e.to_string()))
    }

    /// A fraction in `0.0..=1.0`, or `default` when unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for non-numbers and out-of-range values.
    pub fn fraction(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let value: f32 = self.parsed(key, default)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::Invalid(
                key.to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ))
        }
    }

    /// A required secret that passes `rules`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` or `ConfigError::Insecure`.
    pub fn secret(&self, key: &str, rules: SecretRules) -> Result<String, ConfigError> {
        let value = self.required(key)?;
        rules
            .check(&value)
            .map_err(|weak| ConfigError::Insecure(key.to_string(), weak))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> EnvVars<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvVars::new(move |key: &str| map.get(key).cloned())
    }

    #[test]
    fn test_blank_counts_as_unset() {
        let env = vars(&[("HOST", "   ")]);
        assert!(env.optional("HOST").is_none());
        assert!(matches!(env.required("HOST"), Err(ConfigError::Missing(k)) if k == "HOST"));
    }

    #[test]
    fn test_first_of_prefers_earlier_keys() {
        let env = vars(&[("DATABASE_URL", "postgres://generic")]);
        assert_eq!(
            env.first_of(&["APP_DATABASE_URL", "DATABASE_URL"]).expect("fallback"),
            "postgres://generic"
        );
        assert!(matches!(
            vars(&[]).first_of(&["APP_DATABASE_URL", "DATABASE_URL"]),
            Err(ConfigError::Missing(k)) if k == "APP_DATABASE_URL"
        ));
    }

    #[test]
    fn test_parsed_uses_default_and_reports_key() {
        let env = vars(&[("PORT", "eighty")]);
        assert_eq!(env.parsed("OTHER_PORT", 3000_u16).expect("default"), 3000);
        assert!(matches!(
            env.parsed("PORT", 3000_u16),
            Err(ConfigError::Invalid(k, _)) if k == "PORT"
        ));
    }

    #[test]
    fn test_fraction_range() {
        let env = vars(&[("LOW", "0.25"), ("HIGH", "1.5")]);
        assert!((env.fraction("LOW", 1.0).expect("valid") - 0.25).abs() < f32::EPSILON);
        assert!((env.fraction("UNSET", 0.1).expect("default") - 0.1).abs() < f32::EPSILON);
        assert!(env.fraction("HIGH", 1.0).is_err());
    }

    #[test]
    fn test_secret_is_checked() {
        let env = vars(&[("GOOD", "Qm7vT2kLx9RbN4wZp8Hd"), ("BAD", "replace-with-your-key")]);
        assert!(env.secret("GOOD", SecretRules::VENDOR_KEY).is_ok());
        assert!(matches!(
            env.secret("BAD", SecretRules::VENDOR_KEY),
            Err(ConfigError::Insecure(k, WeakSecret::Placeholder(_))) if k == "BAD"
        ));
    }

    #[test]
    fn test_parsed_with_default() {
        let env = vars(&[]);
        let base = env
            .parsed_with("API_BASE", Some("https://api.example.net/"), |raw| {
                Ok::<_, std::convert::Infallible>(raw.trim_end_matches('/').to_string())
            })
            .expect("default");
        assert_eq!(base, "https://api.example.net");
        assert!(matches!(
            env.parsed_with("API_BASE", None, |raw| Ok::<_, std::convert::Infallible>(raw.to_string())),
            Err(ConfigError::Missing(_))
        ));
    }
}
