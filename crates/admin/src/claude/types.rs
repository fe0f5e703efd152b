//! Types for the Anthropic Messages API.
//!
//! Only the subset needed for single-turn vision requests: text and image
//! content blocks in, text blocks out.

use serde::{Deserialize, Serialize};

/// A message in a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// The role of the message sender ("user" or "assistant").
    pub role: &'static str,
    /// Content blocks of the message.
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// A user message made of the given blocks.
    #[must_use]
    pub const fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// A content block within a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
    /// An image for the model to look at.
    Image {
        /// Where the image bytes come from.
        source: ImageSource,
    },
    /// Any block type we do not use (tool use, thinking, ...).
    #[serde(other)]
    Unsupported,
}

/// Source of an image block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Inline base64 data.
    Base64 {
        /// MIME type, e.g. `image/jpeg`.
        media_type: String,
        /// Base64-encoded bytes.
        data: String,
    },
    /// An image the API fetches itself.
    Url {
        /// Absolute `http(s)` URL.
        url: String,
    },
}

/// Request body for the Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Model to use.
    pub model: &'a str,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Conversation messages.
    pub messages: &'a [Message],
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
}

/// Response from the Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Unique response ID.
    pub id: String,
    /// Model that generated the response.
    pub model: String,
    /// Reason the response stopped.
    pub stop_reason: Option<StopReason>,
    /// Response content blocks.
    pub content: Vec<ContentBlock>,
    /// Token usage information.
    pub usage: Usage,
}

impl ChatResponse {
    /// All text blocks joined together.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// Max tokens reached.
    MaxTokens,
    /// Stop sequence encountered.
    StopSequence,
    /// Tool use requested.
    ToolUse,
    /// The model declined to answer.
    Refusal,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}
