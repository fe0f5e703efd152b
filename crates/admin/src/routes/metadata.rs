//! Image-to-product-metadata endpoint.
//!
//! Accepts either a multipart upload with an `image` field or a JSON body
//! `{"image_url": "..."}` and answers with a suggested title, description
//! and slug.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::instrument;

use super::{Success, ok};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::metadata::{MAX_IMAGE_BYTES, ProductMetadata};
use crate::services::{ImageInput, ImageInputError, MetadataService};
use crate::state::AppState;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// Room for multipart boundaries and headers on top of the image itself.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the metadata router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products/generate-metadata", post(generate_metadata))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + BODY_OVERHEAD_BYTES))
        .layer(CorsLayer::permissive())
}

#[derive(Deserialize)]
struct ImageUrlBody {
    image_url: String,
}

/// The image to describe, from either request shape.
pub struct ImageUpload(pub ImageInput);

impl FromRequest<AppState> for ImageUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(body) = Json::<ImageUrlBody>::from_request(req, state).await?;
            return Ok(Self(ImageInput::url(&body.image_url)?));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            if field.name() != Some(IMAGE_FIELD) {
                continue;
            }
            let media_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(ImageInput::upload(&media_type, data.to_vec())?));
        }

        Err(ImageInputError::Missing.into())
    }
}

#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub data: ProductMetadata,
    /// True when the model's answer was unusable and `data` is a placeholder.
    pub fallback: bool,
}

/// Suggest catalog fields for an artwork image.
#[instrument(skip(state, image), fields(admin_id = %admin.id))]
pub async fn generate_metadata(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ImageUpload(image): ImageUpload,
) -> Result<Json<Success<MetadataResponse>>> {
    let generated = MetadataService::new(state.claude())
        .generate(image)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Metadata generation failed"))?;

    tracing::info!(
        fallback = generated.fallback,
        slug = %generated.data.slug,
        "Metadata generated"
    );

    Ok(ok(MetadataResponse {
        data: generated.data,
        fallback: generated.fallback,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let Json(body) = ok(MetadataResponse {
            data: ProductMetadata::fallback(),
            fallback: true,
        });
        let value = serde_json::to_value(body).expect("serialize");

        assert_eq!(value["success"], true);
        assert_eq!(value["fallback"], true);
        assert_eq!(value["data"]["slug"], ProductMetadata::fallback().slug);
    }
}
