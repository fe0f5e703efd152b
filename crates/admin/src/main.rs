//! Frameshop Admin - Internal catalog and order administration API.
//!
//! This binary serves the admin API on port 3001.
//!
//! # Security
//!
//! Bind to localhost or a private network. Every route but login requires a
//! user holding the `admin` role, re-checked on each request.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - `PostgreSQL` shared with the storefront (`shop` schema)
//! - Anthropic Messages API for product metadata from photos

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use frameshop_admin::config::AdminConfig;
use frameshop_admin::state::AppState;
use frameshop_admin::{db, middleware, routes};
use frameshop_core::telemetry::{self, Install};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;

    // Admin events name the acting admin, so PII is sent
    let _telemetry = telemetry::install(&Install {
        service: env!("CARGO_CRATE_NAME"),
        release: sentry::release_name!(),
        sentry: &config.sentry,
        send_pii: true,
    });

    let pool = db::create_pool(&config.database_url).await?;
    let state = AppState::new(config.clone(), pool)?;
    let sessions = middleware::create_session_layer(state.pool(), state.config());

    // Schema changes go through `fs-cli migrate`, never at startup
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/health/ready", get(ready))
        .merge(routes::routes())
        .layer(sessions)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::request_span)
                .on_response(middleware::record_response),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(addr = %config.socket_addr(), "admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;
    Ok(())
}

/// 503 until the database answers.
async fn ready(State(state): State<AppState>) -> StatusCode {
    if db::ping(state.pool()).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
