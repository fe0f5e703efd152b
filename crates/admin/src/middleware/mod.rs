//! Admin middleware.
//!
//! Outermost first: Sentry, `SetRequestIdLayer`, the [`trace`] span,
//! `PropagateRequestIdLayer` and the session layer. Handlers demand an admin
//! through the [`RequireAdmin`] extractor.

pub mod auth;
pub mod session;
pub mod trace;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use session::create_session_layer;
pub use trace::{record_response, request_span};
