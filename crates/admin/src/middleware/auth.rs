//! Authentication extractor for admin.
//!
//! The session only proves who the caller is. Whether they may act as an
//! admin is checked against `shop.user_role` on every request, so revoking
//! the role takes effect without waiting for the session to expire.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use frameshop_core::AppRole;

use crate::db::UserRepository;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in user holding the admin role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection returned by [`RequireAdmin`].
#[derive(Debug, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// No admin in the session.
    Unauthorized,
    /// Logged in, but the admin role is no longer held.
    Forbidden,
    /// The role check could not be made.
    Unavailable,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Not logged in"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
            Self::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable"),
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin = session_admin(session)
            .await
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let is_admin = UserRepository::new(state.pool())
            .has_role(admin.id, AppRole::Admin)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Admin role check failed");
                AdminAuthRejection::Unavailable
            })?;

        if !is_admin {
            tracing::warn!(user_id = %admin.id, "Session user no longer holds the admin role");
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}

/// The admin stored in the session, if any.
async fn session_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

/// Store the logged-in admin in the session.
///
/// The session ID is cycled first so a pre-login session ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// End the admin session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    session.flush().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use frameshop_core::{Email, UserId};

    use super::*;

    fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: UserId::new(7),
            email: Email::parse("curator@example.com").expect("email"),
        }
    }

    #[tokio::test]
    async fn test_empty_session_has_no_admin() {
        let session = memory_session();
        assert!(session_admin(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_set_then_read_admin() {
        let session = memory_session();
        set_current_admin(&session, &admin()).await.expect("set");

        let stored = session_admin(&session).await.expect("admin");
        assert_eq!(stored.id, UserId::new(7));
        assert_eq!(stored.email.as_str(), "curator@example.com");
    }

    #[tokio::test]
    async fn test_clear_removes_admin() {
        let session = memory_session();
        set_current_admin(&session, &admin()).await.expect("set");
        clear_current_admin(&session).await.expect("clear");

        assert!(session_admin(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_rejection_body_shape() {
        let response = AdminAuthRejection::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Admin access required");
    }
}
