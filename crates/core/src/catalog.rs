//! Catalog records: products, frame styles and print sizes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FrameStyleId, Money, ProductId, SizeOptionId};

/// Category name of framed products. Lines in this category count toward the
/// bulk frame discount.
pub const FRAMES_CATEGORY: &str = "frames";

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    /// Image URLs, first one is the cover.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// URL of the cover image, if any.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// True if this product is a frame (counts toward the bulk discount).
    #[must_use]
    pub fn is_frame(&self) -> bool {
        is_frame_category(&self.category)
    }
}

/// True if `category` names the frames category (case-insensitive).
#[must_use]
pub fn is_frame_category(category: &str) -> bool {
    category.trim().eq_ignore_ascii_case(FRAMES_CATEGORY)
}

/// A frame style offered as an add-on to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct FrameStyle {
    pub id: FrameStyleId,
    pub name: String,
    /// Surcharge added to the product price.
    pub price: Money,
    /// Short preview token shown in the picker (emoji or colour name).
    pub preview: String,
    pub is_available: bool,
}

/// A print size offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct SizeOption {
    pub id: SizeOptionId,
    pub name: String,
    /// Width in inches.
    pub width: i32,
    /// Height in inches.
    pub height: i32,
    /// Surcharge added to the product price.
    pub price: Money,
    pub is_available: bool,
}

impl SizeOption {
    /// Human label such as `A4 (8x12 in)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({}x{} in)", self.name, self.width, self.height)
    }
}

/// The small slice of a product kept in session lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub slug: String,
    pub title: String,
    pub price: Money,
    pub category: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            slug: product.slug.clone(),
            title: product.title.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.cover_image().map(String::from),
        }
    }
}

/// Derive a URL slug from a title.
///
/// Lowercases ASCII alphanumerics, collapses every other run of characters
/// into a single `-`, and trims dashes from both ends.
///
/// ```
/// use frameshop_core::catalog::slugify;
///
/// assert_eq!(slugify("Monsoon in Kerala: A3 Print!"), "monsoon-in-kerala-a3-print");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(category: &str, images: Vec<String>) -> Product {
        Product {
            id: ProductId::new(1),
            title: "Lotus Pond".to_string(),
            slug: "lotus-pond".to_string(),
            description: None,
            price: Money::from_rupees(499),
            category: category.to_string(),
            images,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Hello,   World  "), "hello-world");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Taj@Sunset 2024"), "taj-sunset-2024");
    }

    #[test]
    fn test_frame_category_is_case_insensitive() {
        assert!(product("Frames", Vec::new()).is_frame());
        assert!(product(" frames ", Vec::new()).is_frame());
        assert!(!product("posters", Vec::new()).is_frame());
    }

    #[test]
    fn test_summary_takes_cover_image() {
        let p = product(
            "posters",
            vec!["https://cdn/a.jpg".to_string(), "https://cdn/b.jpg".to_string()],
        );
        let summary = ProductSummary::from(&p);
        assert_eq!(summary.image.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(summary.slug, "lotus-pond");
    }

    #[test]
    fn test_size_label() {
        let size = SizeOption {
            id: SizeOptionId::new(1),
            name: "A4".to_string(),
            width: 8,
            height: 12,
            price: Money::ZERO,
            is_available: true,
        };
        assert_eq!(size.label(), "A4 (8x12 in)");
    }
}
