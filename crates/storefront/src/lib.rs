//! Frameshop Storefront library.
//!
//! The public JSON API as a library, so the binary stays thin and handlers
//! can be tested in isolation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod razorpay;
pub mod routes;
pub mod services;
pub mod state;
