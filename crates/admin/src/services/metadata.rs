//! Product metadata generation from a photo.
//!
//! The model is asked for a JSON object with `title`, `description` and
//! `slug`. Whatever comes back is parsed leniently; anything unusable is
//! replaced by a canned placeholder so the admin form always gets a value
//! to edit.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use frameshop_core::catalog::slugify;

use crate::claude::{ClaudeClient, ClaudeError, ContentBlock, ImageSource, Message};

/// Largest image the Messages API accepts.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image formats the Messages API accepts.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const MAX_TOKENS: u32 = 1024;
const MAX_TITLE_CHARS: usize = 120;

const SYSTEM_PROMPT: &str = "You write catalog copy for an online shop that sells framed art \
prints and posters. You answer with a single JSON object and nothing else.";

const USER_PROMPT: &str = r#"Look at this artwork and write its catalog entry.

Respond with exactly this JSON shape:
{"title": "...", "description": "...", "slug": "..."}

- title: short and evocative, at most 8 words
- description: 2-3 sentences on subject, mood and the rooms it suits
- slug: lowercase words joined by hyphens, derived from the title"#;

const FALLBACK_TITLE: &str = "Untitled Art Print";
const FALLBACK_DESCRIPTION: &str = "A striking art print, ready to frame. Add a description \
that captures its subject and mood.";
const FALLBACK_SLUG: &str = "untitled-art-print";

/// Rejected image input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageInputError {
    #[error("no image provided")]
    Missing,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image is too large ({0} bytes, max 5 MB)")]
    TooLarge(usize),
    #[error("invalid image URL: {0}")]
    InvalidUrl(String),
}

/// A validated image to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Uploaded bytes.
    Upload { media_type: String, data: Vec<u8> },
    /// A publicly reachable image.
    Url(String),
}

impl ImageInput {
    /// Validate an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns `ImageInputError` for empty, oversized or unsupported files.
    pub fn upload(media_type: &str, data: Vec<u8>) -> Result<Self, ImageInputError> {
        let media_type = media_type.trim().to_ascii_lowercase();
        if data.is_empty() {
            return Err(ImageInputError::Missing);
        }
        if !SUPPORTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(ImageInputError::UnsupportedType(media_type));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ImageInputError::TooLarge(data.len()));
        }
        Ok(Self::Upload { media_type, data })
    }

    /// Validate an image URL. Only `http` and `https` are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ImageInputError::InvalidUrl` for anything else.
    pub fn url(raw: &str) -> Result<Self, ImageInputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ImageInputError::Missing);
        }
        let parsed = url::Url::parse(raw).map_err(|e| ImageInputError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageInputError::InvalidUrl(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }
        Ok(Self::Url(parsed.into()))
    }

    fn into_source(self) -> ImageSource {
        match self {
            Self::Upload { media_type, data } => ImageSource::Base64 {
                media_type,
                data: BASE64.encode(data),
            },
            Self::Url(url) => ImageSource::Url { url },
        }
    }
}

/// Catalog fields proposed for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub title: String,
    pub description: String,
    pub slug: String,
}

impl ProductMetadata {
    /// Placeholder used when the model's answer cannot be used.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            slug: FALLBACK_SLUG.to_string(),
        }
    }
}

/// Result of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMetadata {
    pub data: ProductMetadata,
    /// True when `data` is the canned placeholder.
    pub fallback: bool,
}

#[derive(Deserialize)]
struct RawMetadata {
    title: Option<String>,
    description: Option<String>,
    slug: Option<String>,
}

/// Pull a [`ProductMetadata`] out of model output.
///
/// Accepts a bare JSON object or one wrapped in prose or a code fence.
/// Returns `None` if no object parses or the title or description is blank.
#[must_use]
pub fn parse_metadata(text: &str) -> Option<ProductMetadata> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    let json = text.get(start..=end)?;
    let raw: RawMetadata = serde_json::from_str(json).ok()?;

    let title: String = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();
    let description = raw
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())?
        .to_string();

    let slug = raw
        .slug
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&title));
    if slug.is_empty() {
        return None;
    }

    Some(ProductMetadata {
        title: title.trim_end().to_string(),
        description,
        slug,
    })
}

/// Generates product metadata with the vision model.
pub struct MetadataService<'a> {
    claude: &'a ClaudeClient,
}

impl<'a> MetadataService<'a> {
    #[must_use]
    pub const fn new(claude: &'a ClaudeClient) -> Self {
        Self { claude }
    }

    /// Describe `image`.
    ///
    /// Unusable model output yields the fallback with `fallback: true`.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError` only if the API call itself fails.
    #[instrument(skip(self, image), fields(model = %self.claude.model()))]
    pub async fn generate(&self, image: ImageInput) -> Result<GeneratedMetadata, ClaudeError> {
        let message = Message::user(vec![
            ContentBlock::Image {
                source: image.into_source(),
            },
            ContentBlock::Text {
                text: USER_PROMPT.to_string(),
            },
        ]);

        let response = self
            .claude
            .chat(&[message], Some(SYSTEM_PROMPT), MAX_TOKENS)
            .await?;

        Ok(parse_metadata(&response.text()).map_or_else(
            || {
                tracing::warn!(
                    response_id = %response.id,
                    stop_reason = ?response.stop_reason,
                    "Model output was not usable metadata, using fallback"
                );
                GeneratedMetadata {
                    data: ProductMetadata::fallback(),
                    fallback: true,
                }
            },
            |data| GeneratedMetadata {
                data,
                fallback: false,
            },
        ))
    }
}
