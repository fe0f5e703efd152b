//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password login gated on the admin role
//! - `metadata` - Product title/description/slug suggestions from a photo

pub mod auth;
pub mod metadata;

pub use auth::{AdminAuthError, AdminAuthService};
pub use metadata::{GeneratedMetadata, ImageInput, ImageInputError, MetadataService};
