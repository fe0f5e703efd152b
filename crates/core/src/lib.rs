//! Frameshop Core - Shared domain library.
//!
//! This crate provides the types and checkout logic used across all Frameshop
//! components:
//! - `storefront` - Public JSON API (catalog, cart, checkout, order history)
//! - `admin` - Internal administration API (catalog CRUD, orders, roles)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate holds types and pure logic. It has no database access
//! and no HTTP clients; the only outside read is [`EnvVars::process`].
//! Database row mappings are derived behind the `postgres` feature so the
//! crate stays usable anywhere. The `telemetry` feature adds the logging and
//! shutdown bootstrap shared by the server binaries.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, statuses and contact fields
//! - [`catalog`] - Products, frame styles and print sizes
//! - [`cart`] - Session cart with line merging
//! - [`wishlist`] - Deduplicated wishlist
//! - [`recently_viewed`] - Bounded history of viewed products
//! - [`pricing`] - Store settings and checkout quotes
//! - [`order`] - Order records and order drafts
//! - [`secret`] - Strength rules for configured secrets
//! - [`env`] - Typed reads of configuration variables
//! - `telemetry` - Sentry, tracing and shutdown signal (feature `telemetry`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod env;
pub mod order;
pub mod pricing;
pub mod recently_viewed;
pub mod secret;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartError, CartItem, CartLineId};
pub use catalog::{FrameStyle, Product, ProductSummary, SizeOption};
pub use env::{ConfigError, EnvVars};
pub use order::{
    CheckoutError, Customer, CustomerDetails, NewOrder, NewOrderItem, Order, OrderItem,
};
pub use pricing::{CheckoutQuote, SettingError, SettingKey, StoreSettings};
pub use recently_viewed::RecentlyViewed;
pub use secret::{SecretRules, WeakSecret};
pub use types::*;
pub use wishlist::{Wishlist, WishlistItem};
