//! Frameshop Admin library.
//!
//! Catalog, option, settings, order and role administration as a JSON API,
//! plus product metadata suggestions from artwork photos.
//!
//! # Security
//!
//! This crate holds the Anthropic API key and can rewrite the catalog and
//! grant roles. Deploy it on a private network only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod claude;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
