//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin API
//! - `ANTHROPIC_API_KEY` - Anthropic API key for product metadata generation
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `CLAUDE_MODEL` - Vision-capable model ID (default: claude-sonnet-4-20250514)
//! - `ANTHROPIC_API_BASE` - API base URL (default: <https://api.anthropic.com>)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0-1.0 (default: 1.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;

use frameshop_core::telemetry::SentrySettings;
use frameshop_core::{EnvVars, SecretRules};

pub use frameshop_core::ConfigError;

const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub claude: ClaudeConfig,
    pub sentry: SentrySettings,
}

/// Anthropic API configuration. `Debug` redacts the key.
#[derive(Clone)]
pub struct ClaudeConfig {
    pub api_key: SecretString,
    /// Must accept image input
    pub model: String,
    pub api_base: String,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn base_url(raw: &str) -> Result<String, url::ParseError> {
    url::Url::parse(raw)?;
    Ok(raw.trim_end_matches('/').to_string())
}

impl AdminConfig {
    /// Load configuration from the process environment and any `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid,
    /// or if the Anthropic key fails the secret checks.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&EnvVars::process())
    }

    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_vars<F>(vars: &EnvVars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let claude = ClaudeConfig {
            api_key: vars
                .secret("ANTHROPIC_API_KEY", SecretRules::VENDOR_KEY)?
                .into(),
            model: vars
                .optional("CLAUDE_MODEL")
                .unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
            api_base: vars.parsed_with(
                "ANTHROPIC_API_BASE",
                Some(DEFAULT_ANTHROPIC_API_BASE),
                base_url,
            )?,
        };

        Ok(Self {
            database_url: vars.first_of(&["ADMIN_DATABASE_URL", "DATABASE_URL"])?.into(),
            host: vars.parsed("ADMIN_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: vars.parsed("ADMIN_PORT", 3001)?,
            base_url: vars.parsed_with("ADMIN_BASE_URL", None, base_url)?,
            claude,
            sentry: SentrySettings::from_vars(vars, 1.0)?,
        })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub const fn claude(&self) -> &ClaudeConfig {
        &self.claude
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const API_KEY: &str = "sk-ant-api03-Zq81xPm4TvR7";

    fn load(extra: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let mut map: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/frameshop"),
            ("ADMIN_BASE_URL", "http://localhost:3001"),
            ("ANTHROPIC_API_KEY", API_KEY),
        ]);
        map.extend(extra.iter().copied());
        AdminConfig::from_vars(&EnvVars::new(|key: &str| {
            map.get(key).map(|v| (*v).to_string())
        }))
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).expect("config");

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.claude().model, DEFAULT_CLAUDE_MODEL);
        assert_eq!(config.claude().api_base, DEFAULT_ANTHROPIC_API_BASE);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ADMIN_HOST", "0.0.0.0"),
            ("CLAUDE_MODEL", "claude-opus-4-1"),
            ("ANTHROPIC_API_BASE", "http://127.0.0.1:9999/"),
        ])
        .expect("config");

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3001");
        assert_eq!(config.claude().model, "claude-opus-4-1");
        assert_eq!(config.claude().api_base, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_missing_and_weak_key() {
        let empty = EnvVars::new(|_: &str| None);
        assert!(matches!(
            AdminConfig::from_vars(&empty),
            Err(ConfigError::Missing(k)) if k == "ANTHROPIC_API_KEY"
        ));
        assert!(matches!(
            load(&[("ANTHROPIC_API_KEY", "aaaaaaaaaaaaaaaaaaaaaa")]),
            Err(ConfigError::Insecure(..))
        ));
    }

    #[test]
    fn test_claude_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", load(&[]).expect("config").claude);

        assert!(debug_output.contains(DEFAULT_CLAUDE_MODEL));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(API_KEY));
    }
}
