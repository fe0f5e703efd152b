//! Frameshop Storefront - Public JSON API.
//!
//! This binary serves the storefront API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - `PostgreSQL` for catalog, orders, accounts and sessions
//! - Session-held cart, wishlist and recently viewed products
//! - Razorpay Orders API for online payments
//!
//! # Security
//!
//! This binary only reaches the shop database and Razorpay, which is called
//! for order creation only; payment signatures are checked locally. Catalog
//! and order administration live in the admin binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::from_fn;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use frameshop_core::telemetry::{self, Install};
use frameshop_storefront::config::StorefrontConfig;
use frameshop_storefront::state::AppState;
use frameshop_storefront::{db, middleware, routes};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let _telemetry = telemetry::install(&Install {
        service: env!("CARGO_CRATE_NAME"),
        release: sentry::release_name!(),
        sentry: &config.sentry,
        send_pii: false,
    });

    let pool = db::create_pool(&config.database_url).await?;
    let state = AppState::new(config.clone(), pool)?;
    let sessions = middleware::create_session_layer(state.pool(), state.config());

    // The request id middleware fills in `request_id` once it has one
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "storefront_request",
            method = %request.method(),
            path = request.uri().path(),
            request_id = tracing::field::Empty,
        )
    });

    // Schema changes go through `fs-cli migrate`, never at startup
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/health/ready", get(ready))
        .merge(routes::routes())
        .layer(sessions)
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(trace)
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(addr = %config.socket_addr(), "storefront listening");

    // Peer addresses back the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
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
