//! Admin session layer.
//!
//! Admin sessions live in the same `tower_sessions` table as storefront
//! sessions and are told apart by cookie name. They expire after a day of
//! inactivity and are never sent on cross-site requests.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

pub const SESSION_COOKIE_NAME: &str = "fs_admin_session";

const IDLE_TIMEOUT: Duration = Duration::hours(24);

/// Session layer over the shared `PostgreSQL` store.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(PostgresStore::new(pool.clone()))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_TIMEOUT))
        .with_secure(config.base_url.starts_with("https://"))
        .with_same_site(SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
