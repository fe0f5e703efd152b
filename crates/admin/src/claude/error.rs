//! Anthropic client errors.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error response other than the two below. `kind` is the API's
    /// error type, or the status code when the body was not the usual
    /// envelope.
    #[error("API error ({kind}): {message}")]
    Api { kind: String, message: String },

    #[error("rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("API key rejected")]
    InvalidApiKey,

    #[error("parse error: {0}")]
    Parse(String),
}

impl ClaudeError {
    /// Build an `Api` error from a non-success status and its body.
    pub(super) fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: Detail,
        }

        #[derive(Deserialize)]
        struct Detail {
            #[serde(rename = "type")]
            kind: String,
            message: String,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(Envelope { error }) => Self::Api {
                kind: error.kind,
                message: error.message,
            },
            Err(_) => Self::Api {
                kind: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            },
        }
    }
}
