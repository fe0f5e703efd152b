//! Anthropic Messages API integration.
//!
//! Used for one job: looking at a product photo and proposing a title,
//! description and slug for the catalog entry.

mod client;
mod error;
pub mod types;

pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use types::{ChatResponse, ContentBlock, ImageSource, Message};
