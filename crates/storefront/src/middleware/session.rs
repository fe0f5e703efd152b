//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. Besides the
//! login state, the session holds the cart, wishlist and recently viewed
//! products under their namespace keys.

use serde::{Serialize, de::DeserializeOwned};
use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fs_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    // The session table is created by the storefront migrations
    let store = PostgresStore::new(pool.clone());

    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Read a session value, falling back to its default when absent.
///
/// A value that no longer deserializes (for example after a format change)
/// is treated as absent rather than failing the request.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_session_value<T>(
    session: &Session,
    key: &str,
) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(key, error = %e, "Discarding unreadable session value");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Write a session value.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the session cannot
/// be modified.
pub async fn store_session_value<T>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + Sync,
{
    session.insert(key, value).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use frameshop_core::{Cart, CartItem, Money, ProductId};

    use super::*;

    fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_missing_value_defaults() {
        let session = memory_session();
        let cart: Cart = load_session_value(&session, Cart::SESSION_KEY)
            .await
            .expect("load");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_load_unreadable_value_defaults() {
        let session = memory_session();
        session
            .insert(Cart::SESSION_KEY, "not a cart")
            .await
            .expect("insert");

        let cart: Cart = load_session_value(&session, Cart::SESSION_KEY)
            .await
            .expect("load");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let session = memory_session();
        let mut cart = Cart::new();
        cart.add(CartItem {
            product_id: ProductId::new(1),
            slug: "dusk".to_string(),
            title: "Dusk".to_string(),
            category: "frames".to_string(),
            image: None,
            frame_style_id: None,
            frame_style_name: None,
            size_id: None,
            size_name: None,
            unit_price: Money::from_rupees(500),
            quantity: 2,
        })
        .expect("add");

        store_session_value(&session, Cart::SESSION_KEY, &cart)
            .await
            .expect("store");
        let loaded: Cart = load_session_value(&session, Cart::SESSION_KEY)
            .await
            .expect("load");

        assert_eq!(loaded, cart);
    }
}
