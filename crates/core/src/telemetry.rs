//! Process-wide observability for the server binaries.
//!
//! [`install`] brings up Sentry first and then the tracing subscriber, so
//! warnings become Sentry events and info/debug lines become breadcrumbs.
//! Logs are JSON lines when `FLY_APP_NAME` is set and plain text otherwise.

use std::borrow::Cow;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::env::{ConfigError, EnvVars};

/// Sentry settings shared by every binary.
#[derive(Debug, Clone, Default)]
pub struct SentrySettings {
    /// Sentry stays off when unset
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl SentrySettings {
    /// Read `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE` (default
    /// 1.0) and `SENTRY_TRACES_SAMPLE_RATE` (default `traces_default`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a rate is outside `0.0..=1.0`.
    pub fn from_vars<F>(vars: &EnvVars<F>, traces_default: f32) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            dsn: vars.optional("SENTRY_DSN"),
            environment: vars.optional("SENTRY_ENVIRONMENT"),
            sample_rate: vars.fraction("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: vars.fraction("SENTRY_TRACES_SAMPLE_RATE", traces_default)?,
        })
    }
}

/// Keeps Sentry flushing until dropped at the end of `main`.
#[must_use = "dropping the guard stops error reporting"]
pub struct Telemetry {
    _sentry: Option<sentry::ClientInitGuard>,
}

/// Options for [`install`].
pub struct Install<'a> {
    /// Crate name used in the default log filter
    pub service: &'a str,
    /// Usually `sentry::release_name!()` from the binary
    pub release: Option<Cow<'static, str>>,
    pub sentry: &'a SentrySettings,
    /// Attach user details (emails, addresses) to Sentry events
    pub send_pii: bool,
}

/// Start Sentry and the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `<service>=info,tower_http=debug`.
pub fn install(opts: &Install<'_>) -> Telemetry {
    let guard = opts.sentry.dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: opts.release.clone(),
                environment: opts.sentry.environment.clone().map(Cow::Owned),
                sample_rate: opts.sentry.sample_rate,
                traces_sample_rate: opts.sentry.traces_sample_rate,
                attach_stacktrace: true,
                send_default_pii: opts.send_pii,
                ..Default::default()
            },
        ))
    });

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info,tower_http=debug", opts.service)));
    let json = std::env::var_os("FLY_APP_NAME").is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true)))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(sentry_tracing::layer().event_filter(sentry_filter))
        .init();

    if guard.is_some() {
        tracing::info!(service = opts.service, "Sentry initialized");
    }
    Telemetry { _sentry: guard }
}

fn sentry_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    let level = *metadata.level();
    if level <= tracing::Level::WARN {
        EventFilter::Event
    } else if level <= tracing::Level::DEBUG {
        EventFilter::Breadcrumb
    } else {
        EventFilter::Ignore
    }
}

/// Tag later Sentry events on this scope with the signed-in user.
pub fn identify(id: impl std::fmt::Display, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(id.to_string()),
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

pub fn forget_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

/// Record an info breadcrumb with string fields.
pub fn breadcrumb(category: &str, message: &str, fields: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data: fields
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).into()))
            .collect(),
        ..Default::default()
    });
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
///
/// A signal whose handler cannot be installed never fires; the other still
/// does.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)], traces_default: f32) -> Result<SentrySettings, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        SentrySettings::from_vars(
            &EnvVars::new(|key: &str| map.get(key).map(|v| (*v).to_string())),
            traces_default,
        )
    }

    #[test]
    fn test_sentry_settings_defaults() {
        let sentry = settings(&[], 0.1).expect("defaults");
        assert!(sentry.dsn.is_none());
        assert!((sentry.sample_rate - 1.0).abs() < f32::EPSILON);
        assert!((sentry.traces_sample_rate - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sentry_settings_reject_bad_rate() {
        assert!(matches!(
            settings(&[("SENTRY_SAMPLE_RATE", "2")], 1.0),
            Err(ConfigError::Invalid(k, _)) if k == "SENTRY_SAMPLE_RATE"
        ));
    }
}
