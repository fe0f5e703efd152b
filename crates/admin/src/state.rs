//! Handler state: config, pool and the Anthropic client.

use std::sync::Arc;

use sqlx::PgPool;

use crate::claude::{ClaudeClient, ClaudeError};
use crate::config::AdminConfig;

/// Shared by every handler through one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    claude: ClaudeClient,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when the Anthropic HTTP client cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, ClaudeError> {
        let claude = ClaudeClient::new(config.claude())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                claude,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn claude(&self) -> &ClaudeClient {
        &self.inner.claude
    }
}
