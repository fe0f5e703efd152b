//! Store settings route handlers.
//!
//! The storefront caches settings for up to five minutes, so a change made
//! here can take that long to reach checkout.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use frameshop_core::{SettingKey, StoreSettings};

use super::{Success, ok};
use crate::db::{SettingEntry, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(list))
        .route("/api/settings/{key}", put(upsert))
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// Rows as stored.
    pub settings: Vec<SettingEntry>,
    /// What checkout uses, defaults filled in.
    pub effective: StoreSettings,
}

/// Stored and effective settings.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Success<SettingsResponse>>> {
    let repo = SettingsRepository::new(state.pool());
    let settings = repo.list().await?;
    let effective =
        StoreSettings::from_pairs(settings.iter().map(|e| (e.key.as_str(), e.value.as_str())));

    Ok(ok(SettingsResponse {
        settings,
        effective,
    }))
}

/// Body for a settings update. The value may be a JSON string or number.
#[derive(Debug, Deserialize)]
pub struct SettingInput {
    pub value: Value,
}

impl SettingInput {
    fn as_text(&self) -> Result<String> {
        match &self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(AppError::BadRequest(
                "value must be a string or number".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub setting: SettingEntry,
}

/// Insert or replace one setting.
#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn upsert(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: std::result::Result<Json<SettingInput>, JsonRejection>,
) -> Result<Json<Success<SettingResponse>>> {
    let Json(input) = payload?;
    let key: SettingKey = key.parse()?;
    let value = key.normalize(&input.as_text()?)?;

    let setting = SettingsRepository::new(state.pool())
        .upsert(key, &value)
        .await?;
    tracing::info!(key = %key, value = %setting.value, "Setting updated");

    Ok(ok(SettingResponse { setting }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: Value) -> SettingInput {
        SettingInput { value }
    }

    #[test]
    fn test_value_accepts_string_and_number() {
        assert_eq!(input(Value::from("99.5")).as_text().expect("text"), "99.5");
        assert_eq!(input(Value::from(150)).as_text().expect("number"), "150");
    }

    #[test]
    fn test_value_rejects_other_json() {
        assert!(matches!(
            input(Value::Bool(true)).as_text(),
            Err(AppError::BadRequest(_))
        ));
        assert!(input(Value::Null).as_text().is_err());
    }

    #[test]
    fn test_unknown_key_is_bad_request() {
        use axum::response::IntoResponse;

        let err: AppError = "free_gift"
            .parse::<SettingKey>()
            .expect_err("unknown key")
            .into();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }
}
