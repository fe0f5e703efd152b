//! Role assignment route handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use frameshop_core::{AppRole, Email, UserId};

use super::{Done, Success, ok};
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{CurrentAdmin, RoleAssignment};
use crate::state::AppState;

/// Build the roles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/roles", get(list).post(grant))
        .route("/api/roles/{user_id}/{role}", delete(revoke))
}

#[derive(Debug, Serialize)]
pub struct RoleList {
    pub roles: Vec<RoleAssignment>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: RoleAssignment,
}

#[derive(Debug, Deserialize)]
pub struct GrantInput {
    pub email: String,
    pub role: AppRole,
}

/// All role assignments.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Success<RoleList>>> {
    let roles = UserRepository::new(state.pool()).list_roles().await?;
    Ok(ok(RoleList { roles }))
}

/// Grant a role to the account with the given email.
#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn grant(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<GrantInput>, JsonRejection>,
) -> Result<Json<Success<RoleResponse>>> {
    let Json(input) = payload?;
    let email = Email::parse(&input.email)
        .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

    let role = UserRepository::new(state.pool())
        .grant_role(&email, input.role)
        .await?;
    tracing::info!(user_id = %role.user_id, role = %role.role, "Role granted");

    Ok(ok(RoleResponse { role }))
}

/// Check that a revocation does not lock the caller out.
fn ensure_not_self_demotion(admin: &CurrentAdmin, user_id: UserId, role: AppRole) -> Result<()> {
    if admin.id == user_id && role == AppRole::Admin {
        return Err(AppError::BadRequest(
            "You cannot revoke your own admin role".to_string(),
        ));
    }
    Ok(())
}

/// Revoke a role.
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn revoke(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((user_id, role)): Path<(UserId, String)>,
) -> Result<Json<Success<Done>>> {
    let role: AppRole = role.parse().map_err(AppError::BadRequest)?;
    ensure_not_self_demotion(&admin, user_id, role)?;

    UserRepository::new(state.pool())
        .revoke_role(user_id, role)
        .await?;
    tracing::info!(user_id = %user_id, role = %role, "Role revoked");

    Ok(ok(Done {}))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(id: i32) -> CurrentAdmin {
        CurrentAdmin {
            id: UserId::new(id),
            email: Email::parse("owner@example.com").expect("email"),
        }
    }

    #[test]
    fn test_cannot_revoke_own_admin_role() {
        let me = admin(1);
        assert!(matches!(
            ensure_not_self_demotion(&me, UserId::new(1), AppRole::Admin),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_may_revoke_others_or_own_user_role() {
        let me = admin(1);
        assert!(ensure_not_self_demotion(&me, UserId::new(2), AppRole::Admin).is_ok());
        assert!(ensure_not_self_demotion(&me, UserId::new(1), AppRole::User).is_ok());
    }

    #[test]
    fn test_grant_input_parses_role() {
        let input: GrantInput = serde_json::from_value(serde_json::json!({
            "email": "framer@example.com",
            "role": "admin",
        }))
        .expect("deserialize");
        assert_eq!(input.role, AppRole::Admin);
    }
}
