//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and password login
//! - `checkout` - Order placement and payment verification

pub mod auth;
pub mod checkout;
