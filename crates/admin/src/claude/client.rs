//! Anthropic Messages API client.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::ClaudeConfig;

use super::error::ClaudeError;
use super::types::{ChatRequest, ChatResponse, Message};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Anthropic API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    messages_url: String,
    model: String,
}

impl ClaudeClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClaudeConfig) -> Result<Self, ClaudeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                api_key: config.api_key.clone(),
                messages_url: format!("{}/v1/messages", config.api_base),
                model: config.model.clone(),
            }),
        })
    }

    /// Model used for requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a request and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::RateLimited` or `ClaudeError::InvalidApiKey` for
    /// those statuses, `ClaudeError::Api` for other error responses, and
    /// `ClaudeError::Http`/`ClaudeError::Parse` on transport failures.
    #[instrument(skip(self, messages, system), fields(model = %self.inner.model))]
    pub async fn chat(
        &self,
        messages: &[Message],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<ChatResponse, ClaudeError> {
        let request = ChatRequest {
            model: &self.inner.model,
            max_tokens,
            messages,
            system,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.messages_url)
            .header("x-api-key", self.inner.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ClaudeError::Parse(format!("Failed to parse response: {e}")))?;

        tracing::debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "Messages API call complete"
        );

        Ok(parsed)
    }
}

/// Turn a non-success response into a `ClaudeError`.
async fn error_from_response(status: reqwest::StatusCode, response: reqwest::Response) -> ClaudeError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ClaudeError::RateLimited {
            retry_after_secs: retry_after,
        };
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ClaudeError::InvalidApiKey;
    }

    match response.text().await {
        Ok(body) => ClaudeError::from_body(status, &body),
        Err(e) => ClaudeError::Http(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_messages_url() {
        let client = ClaudeClient::new(&ClaudeConfig {
            api_key: SecretString::from("sk-ant-api03-test"),
            model: "claude-sonnet-4-20250514".to_string(),
            api_base: "http://127.0.0.1:9999".to_string(),
        })
        .expect("client");

        assert_eq!(client.inner.messages_url, "http://127.0.0.1:9999/v1/messages");
        assert_eq!(client.model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_claude_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ClaudeClient>();
    }
}
