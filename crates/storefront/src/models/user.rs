//! Customer account types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use frameshop_core::{Email, UserId};

/// A customer account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
