//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `RAZORPAY_KEY_ID` - Razorpay API key ID (sent to the browser checkout)
//! - `RAZORPAY_KEY_SECRET` - Razorpay API key secret (order creation and signatures)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `RAZORPAY_API_BASE` - Razorpay API base URL (default: <https://api.razorpay.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.1)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;

use frameshop_core::telemetry::SentrySettings;
use frameshop_core::{EnvVars, SecretRules};

pub use frameshop_core::ConfigError;

const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com";

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Contains the database password
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL; `https` turns on secure cookies
    pub base_url: String,
    pub razorpay: RazorpayConfig,
    pub sentry: SentrySettings,
}

/// Razorpay API configuration. `Debug` redacts the key secret.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key ID, also handed to the browser checkout widget
    pub key_id: String,
    /// Used for basic auth and payment signatures
    pub key_secret: SecretString,
    pub api_base: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Check an absolute URL and drop any trailing slash.
fn base_url(raw: &str) -> Result<String, url::ParseError> {
    url::Url::parse(raw)?;
    Ok(raw.trim_end_matches('/').to_string())
}

impl StorefrontConfig {
    /// Load configuration from the process environment, after reading a
    /// `.env` file if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, a value does
    /// not parse, or the Razorpay secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::from_vars(&EnvVars::process())
    }

    /// Build the configuration from `vars`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_vars<F>(vars: &EnvVars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: vars
                .first_of(&["STOREFRONT_DATABASE_URL", "DATABASE_URL"])?
                .into(),
            host: vars.parsed("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: vars.parsed("STOREFRONT_PORT", 3000)?,
            base_url: vars.parsed_with("STOREFRONT_BASE_URL", None, base_url)?,
            razorpay: RazorpayConfig {
                key_id: vars.required("RAZORPAY_KEY_ID")?,
                key_secret: vars
                    .secret("RAZORPAY_KEY_SECRET", SecretRules::VENDOR_KEY)?
                    .into(),
                api_base: vars.parsed_with(
                    "RAZORPAY_API_BASE",
                    Some(DEFAULT_RAZORPAY_API_BASE),
                    base_url,
                )?,
            },
            sentry: SentrySettings::from_vars(vars, 0.1)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    const KEY_SECRET: &str = "Hq4Vz8nTm2Lc7Wk9Rb3X";

    fn load(extra: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let mut map: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/frameshop"),
            ("STOREFRONT_BASE_URL", "https://shop.example.in/"),
            ("RAZORPAY_KEY_ID", "rzp_test_Kx81Pq"),
            ("RAZORPAY_KEY_SECRET", KEY_SECRET),
        ]);
        map.extend(extra.iter().copied());
        StorefrontConfig::from_vars(&EnvVars::new(|key: &str| {
            map.get(key).map(|v| (*v).to_string())
        }))
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).expect("config");

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "https://shop.example.in");
        assert_eq!(config.razorpay.api_base, DEFAULT_RAZORPAY_API_BASE);
        assert_eq!(config.razorpay.key_secret.expose_secret(), KEY_SECRET);
        assert!((config.sentry.traces_sample_rate - 0.1).abs() < f32::EPSILON);
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_specific_database_url_wins() {
        let config = load(&[("STOREFRONT_DATABASE_URL", "postgres://db/storefront")])
            .expect("config");
        assert_eq!(config.database_url.expose_secret(), "postgres://db/storefront");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("STOREFRONT_PORT", "http")]),
            Err(ConfigError::Invalid(k, _)) if k == "STOREFRONT_PORT"
        ));
        assert!(matches!(
            load(&[("STOREFRONT_BASE_URL", "shop.example.in")]),
            Err(ConfigError::Invalid(k, _)) if k == "STOREFRONT_BASE_URL"
        ));
        assert!(matches!(
            load(&[("RAZORPAY_KEY_SECRET", "your-razorpay-secret")]),
            Err(ConfigError::Insecure(k, _)) if k == "RAZORPAY_KEY_SECRET"
        ));
    }

    #[test]
    fn test_razorpay_config_debug_redacts_secret() {
        let debug_output = format!("{:?}", load(&[]).expect("config").razorpay);

        assert!(debug_output.contains("rzp_test_Kx81Pq"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(KEY_SECRET));
    }
}
