//! Customer authentication route handlers.
//!
//! Email and password accounts. Logging in stores a [`CurrentUser`] in the
//! session; the cart and wishlist carry over because they live in the same
//! session.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frameshop_core::{Email, UserId, telemetry};

use super::{Success, ok};
use crate::error::Result;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Credentials body for login and registration.
#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: Email,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

impl From<CurrentUser> for UserView {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(session, &current).await?;
    telemetry::identify(user.id, user.email.as_str());
    Ok(())
}

/// Create an account and log in.
#[instrument(skip(state, session, payload))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Success<UserResponse>>> {
    let Json(body) = payload?;

    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password)
        .await?;
    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "Customer registered");

    Ok(ok(UserResponse {
        user: UserView::from(&user),
    }))
}

/// Log in with email and password.
#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Success<UserResponse>>> {
    let Json(body) = payload?;

    let user = AuthService::new(state.pool())
        .log_in(&body.email, &body.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;
    start_session(&session, &user).await?;

    Ok(ok(UserResponse {
        user: UserView::from(&user),
    }))
}

#[derive(Debug, Serialize)]
pub struct Empty {}

/// Log out. The session's cart and wishlist are kept.
pub async fn logout(session: Session) -> Result<Json<Success<Empty>>> {
    clear_current_user(&session).await?;
    telemetry::forget_user();
    Ok(ok(Empty {}))
}

/// The logged-in customer.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<Success<UserResponse>> {
    ok(UserResponse {
        user: user.into(),
    })
}
