//! Authentication route handlers for admin.
//!
//! Email and password login against the shared user table. Only users
//! holding the admin role get a session.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frameshop_core::{Email, UserId, telemetry};

use super::{Done, Success, ok};
use crate::error::Result;
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub admin: AdminView,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub id: UserId,
    pub email: Email,
}

impl From<CurrentAdmin> for AdminView {
    fn from(admin: CurrentAdmin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
        }
    }
}

/// Log in with email and password.
#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Success<AdminResponse>>> {
    let Json(body) = payload?;

    let user = AdminAuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Admin login failed"))?;

    let admin = CurrentAdmin::from(user);
    set_current_admin(&session, &admin).await?;
    telemetry::identify(admin.id, admin.email.as_str());

    tracing::info!(user_id = %admin.id, "Admin logged in");

    Ok(ok(AdminResponse {
        admin: admin.into(),
    }))
}

/// End the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Success<Done>>> {
    clear_current_admin(&session).await?;
    telemetry::forget_user();
    Ok(ok(Done {}))
}

/// The logged-in admin.
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<Success<AdminResponse>> {
    ok(AdminResponse {
        admin: admin.into(),
    })
}
