//! Storefront middleware.
//!
//! Outermost first, as stacked in `main.rs`: Sentry, the trace span, the
//! request id, permissive CORS (any shop front may call the API) and the
//! `PostgreSQL` session layer. Governor rate limits sit on route groups.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter, checkout_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, load_session_value, store_session_value};
