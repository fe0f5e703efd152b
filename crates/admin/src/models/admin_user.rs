//! Admin user and role types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use frameshop_core::{AppRole, Email, UserId};

/// A user who passed the admin login checks.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// User's database ID.
    pub id: UserId,
    /// Login email address.
    pub email: Email,
}

/// One row of `shop.user_role`, joined with the user's email.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RoleAssignment {
    pub user_id: UserId,
    pub email: String,
    pub role: AppRole,
    pub created_at: DateTime<Utc>,
}
