//! Core types for Frameshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod money;
pub mod status;

pub use contact::{ContactError, Email, Phone, Pincode};
pub use id::*;
pub use money::{CURRENCY_CODE, Money};
pub use status::*;
