//! Admin handler errors.
//!
//! Same envelope as the storefront, `{"success": false, "error": "<message>"}`.
//! Anthropic failures surface as 502 without the upstream text, which can
//! echo parts of the key.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use frameshop_core::SettingError;

use crate::claude::ClaudeError;
use crate::db::RepositoryError;
use crate::services::{AdminAuthError, ImageInputError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Claude API operation failed.
    #[error("Claude error: {0}")]
    Claude(#[from] ClaudeError),

    /// Login was refused.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Setting key or value was rejected.
    #[error("{0}")]
    Setting(#[from] SettingError),

    /// Uploaded or linked image was rejected.
    #[error("{0}")]
    Image(#[from] ImageInputError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(RepositoryError::NotFound | RepositoryError::Conflict(_)) => false,
            Self::Auth(err) => matches!(err, AdminAuthError::Repository(_)),
            Self::Claude(err) => !matches!(err, ClaudeError::RateLimited { .. }),
            Self::Database(_) | Self::Session(_) => true,
            _ => false,
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AdminAuthError::NotAdmin => StatusCode::FORBIDDEN,
                AdminAuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Claude(_) => StatusCode::BAD_GATEWAY,
            Self::Image(ImageInputError::TooLarge(_)) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Image(ImageInputError::UnsupportedType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Setting(_) | Self::Image(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    fn client_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Session(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AdminAuthError::NotAdmin => "Admin access required".to_string(),
                AdminAuthError::Repository(_) => "Authentication error".to_string(),
            },
            Self::Claude(ClaudeError::RateLimited { .. }) => {
                "AI service is busy, try again shortly".to_string()
            }
            Self::Claude(_) => "AI service error".to_string(),
            Self::Setting(err) => err.to_string(),
            Self::Image(err) => err.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let body = json!({
            "success": false,
            "error": self.client_message(),
        });

        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::DataCorruption("test".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_and_repository_mapping() {
        assert_eq!(
            get_status(AdminAuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AdminAuthError::NotAdmin.into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(RepositoryError::Conflict("slug taken".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ClaudeError::Parse("bad".to_string()).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_image_errors_are_client_errors() {
        assert_eq!(
            get_status(ImageInputError::TooLarge(6_000_000).into()),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(ImageInputError::Missing.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_details_are_redacted() {
        let err = AppError::Claude(ClaudeError::Api {
            kind: "permission_error".to_string(),
            message: "key sk-ant-123 revoked".to_string(),
        });
        assert_eq!(err.client_message(), "AI service error");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::Auth(AdminAuthError::NotAdmin).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Admin access required");
    }
}
