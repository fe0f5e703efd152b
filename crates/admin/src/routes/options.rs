//! Frame style and print size route handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use frameshop_core::{FrameStyle, FrameStyleId, Money, SizeOption, SizeOptionId};

use super::{Done, Success, ok};
use crate::db::{FrameStyleDraft, OptionsRepository, SizeDraft};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the options router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/frame-styles",
            get(list_frame_styles).post(create_frame_style),
        )
        .route(
            "/api/frame-styles/{id}",
            put(update_frame_style).delete(delete_frame_style),
        )
        .route("/api/frame-styles/{id}/toggle", post(toggle_frame_style))
        .route("/api/sizes", get(list_sizes).post(create_size))
        .route("/api/sizes/{id}", put(update_size).delete(delete_size))
        .route("/api/sizes/{id}/toggle", post(toggle_size))
}

const fn default_available() -> bool {
    true
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    Ok(name.to_string())
}

fn non_negative(price: Money) -> Result<Money> {
    if price.is_negative() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    Ok(price)
}

// =============================================================================
// Frame styles
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct FrameStyleInput {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub preview: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

impl FrameStyleInput {
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a blank name or negative price.
    pub fn into_draft(self) -> Result<FrameStyleDraft> {
        Ok(FrameStyleDraft {
            name: required_name(&self.name)?,
            price: non_negative(self.price)?,
            preview: self.preview.trim().to_string(),
            is_available: self.is_available,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FrameStyleList {
    pub frame_styles: Vec<FrameStyle>,
}

#[derive(Debug, Serialize)]
pub struct FrameStyleResponse {
    pub frame_style: FrameStyle,
}

pub async fn list_frame_styles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Success<FrameStyleList>>> {
    let frame_styles = OptionsRepository::new(state.pool())
        .list_frame_styles()
        .await?;
    Ok(ok(FrameStyleList { frame_styles }))
}

#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn create_frame_style(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<FrameStyleInput>, JsonRejection>,
) -> Result<Json<Success<FrameStyleResponse>>> {
    let Json(input) = payload?;
    let frame_style = OptionsRepository::new(state.pool())
        .create_frame_style(&input.into_draft()?)
        .await?;
    Ok(ok(FrameStyleResponse { frame_style }))
}

#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn update_frame_style(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<FrameStyleId>,
    payload: std::result::Result<Json<FrameStyleInput>, JsonRejection>,
) -> Result<Json<Success<FrameStyleResponse>>> {
    let Json(input) = payload?;
    let frame_style = OptionsRepository::new(state.pool())
        .update_frame_style(id, &input.into_draft()?)
        .await?;
    Ok(ok(FrameStyleResponse { frame_style }))
}

/// Flip availability. Unavailable styles disappear from the storefront.
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn toggle_frame_style(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<FrameStyleId>,
) -> Result<Json<Success<FrameStyleResponse>>> {
    let frame_style = OptionsRepository::new(state.pool())
        .toggle_frame_style(id)
        .await?;
    tracing::info!(is_available = frame_style.is_available, "Frame style toggled");
    Ok(ok(FrameStyleResponse { frame_style }))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete_frame_style(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<FrameStyleId>,
) -> Result<Json<Success<Done>>> {
    OptionsRepository::new(state.pool())
        .delete_frame_style(id)
        .await?;
    Ok(ok(Done {}))
}

// =============================================================================
// Sizes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SizeInput {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub price: Money,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

impl SizeInput {
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a blank name, a non-positive
    /// dimension or a negative price.
    pub fn into_draft(self) -> Result<SizeDraft> {
        if self.width <= 0 || self.height <= 0 {
            return Err(AppError::BadRequest(
                "width and height must be positive".to_string(),
            ));
        }
        Ok(SizeDraft {
            name: required_name(&self.name)?,
            width: self.width,
            height: self.height,
            price: non_negative(self.price)?,
            is_available: self.is_available,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SizeList {
    pub sizes: Vec<SizeOption>,
}

#[derive(Debug, Serialize)]
pub struct SizeResponse {
    pub size: SizeOption,
}

pub async fn list_sizes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Success<SizeList>>> {
    let sizes = OptionsRepository::new(state.pool()).list_sizes().await?;
    Ok(ok(SizeList { sizes }))
}

#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn create_size(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<SizeInput>, JsonRejection>,
) -> Result<Json<Success<SizeResponse>>> {
    let Json(input) = payload?;
    let size = OptionsRepository::new(state.pool())
        .create_size(&input.into_draft()?)
        .await?;
    Ok(ok(SizeResponse { size }))
}

#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn update_size(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SizeOptionId>,
    payload: std::result::Result<Json<SizeInput>, JsonRejection>,
) -> Result<Json<Success<SizeResponse>>> {
    let Json(input) = payload?;
    let size = OptionsRepository::new(state.pool())
        .update_size(id, &input.into_draft()?)
        .await?;
    Ok(ok(SizeResponse { size }))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn toggle_size(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SizeOptionId>,
) -> Result<Json<Success<SizeResponse>>> {
    let size = OptionsRepository::new(state.pool()).toggle_size(id).await?;
    tracing::info!(is_available = size.is_available, "Size toggled");
    Ok(ok(SizeResponse { size }))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete_size(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SizeOptionId>,
) -> Result<Json<Success<Done>>> {
    OptionsRepository::new(state.pool()).delete_size(id).await?;
    Ok(ok(Done {}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_style_defaults_to_available() {
        let input: FrameStyleInput = serde_json::from_value(serde_json::json!({
            "name": " Teak ",
            "price": "350",
        }))
        .expect("deserialize");
        let draft = input.into_draft().expect("valid");

        assert_eq!(draft.name, "Teak");
        assert!(draft.is_available);
        assert!(draft.preview.is_empty());
    }

    #[test]
    fn test_frame_style_rejects_blank_name() {
        let input = FrameStyleInput {
            name: "  ".to_string(),
            price: Money::from_rupees(100),
            preview: String::new(),
            is_available: true,
        };
        assert!(matches!(input.into_draft(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_size_rejects_bad_dimensions_and_price() {
        let size = |width, height, price| SizeInput {
            name: "A4".to_string(),
            width,
            height,
            price: Money::from_rupees(price),
            is_available: true,
        };

        assert!(size(8, 12, 0).into_draft().is_ok());
        assert!(matches!(
            size(0, 12, 0).into_draft(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            size(8, 12, -50).into_draft(),
            Err(AppError::BadRequest(_))
        ));
    }
}
