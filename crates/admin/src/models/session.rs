//! What an admin session stores.

use serde::{Deserialize, Serialize};

use frameshop_core::{Email, UserId};

/// Identity only. The admin role is re-read from the database on every
/// request, so revoking it takes effect at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
}

impl From<super::AdminUser> for CurrentAdmin {
    fn from(user: super::AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

pub mod keys {
    pub const CURRENT_ADMIN: &str = "admin.current";
}
