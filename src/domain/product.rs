//! Product catalog types
//!
//! Products are owned by the catalog; carts and recently-viewed lists only
//! reference them by id.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{DomainError, Price};

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_ARTIST_LEN: usize = 100;
const MIN_YEAR: i32 = 1800;
const MAX_RATING: f64 = 5.0;

/// Largest price the catalog stores (`NUMERIC(12, 2)`)
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Medium used when none is supplied
pub const DEFAULT_MEDIUM: &str = "Oil on Canvas";

/// Fixed set of painting categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Abstract,
    Landscape,
    Portrait,
    StillLife,
    Modern,
    Classical,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Abstract,
        Category::Landscape,
        Category::Portrait,
        Category::StillLife,
        Category::Modern,
        Category::Classical,
    ];

    /// Storage / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Abstract => "abstract",
            Category::Landscape => "landscape",
            Category::Portrait => "portrait",
            Category::StillLife => "still-life",
            Category::Modern => "modern",
            Category::Classical => "classical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| DomainError::InvalidProduct(format!("Unknown category: {s}")))
    }
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub artist: String,
    pub category: Category,
    pub medium: String,
    pub dimensions: String,
    pub year: i32,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
    pub rating: f64,
    pub num_reviews: i32,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image, used as the display thumbnail
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Product data before it is stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub artist: String,
    pub category: Category,
    #[serde(default)]
    pub medium: Option<String>,
    pub dimensions: String,
    pub year: i32,
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
}

fn default_true() -> bool {
    true
}

impl NewProduct {
    /// Trim text fields, lowercase tags and fill the default medium, then
    /// check field limits against the current year.
    pub fn normalized(self) -> Result<Self, DomainError> {
        self.normalized_for_year(Utc::now().year())
    }

    pub(crate) fn normalized_for_year(self, current_year: i32) -> Result<Self, DomainError> {
        let product = Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            artist: self.artist.trim().to_string(),
            medium: Some(
                self.medium
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_MEDIUM.to_string()),
            ),
            dimensions: self.dimensions.trim().to_string(),
            tags: self
                .tags
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            ..self
        };

        check_text("Product title", &product.title, MAX_TITLE_LEN)?;
        check_text("Product description", &product.description, MAX_DESCRIPTION_LEN)?;
        check_text("Artist name", &product.artist, MAX_ARTIST_LEN)?;
        if product.price.value() > MAX_PRICE {
            return Err(DomainError::InvalidProduct(format!(
                "Price cannot exceed {MAX_PRICE}"
            )));
        }
        if product.dimensions.is_empty() {
            return Err(DomainError::InvalidProduct("Dimensions are required".to_string()));
        }
        if product.year < MIN_YEAR {
            return Err(DomainError::InvalidProduct(format!("Year must be after {MIN_YEAR}")));
        }
        if product.year > current_year {
            return Err(DomainError::InvalidProduct("Year cannot be in the future".to_string()));
        }
        if !(0.0..=MAX_RATING).contains(&product.rating) {
            return Err(DomainError::InvalidProduct(
                "Rating must be between 0 and 5".to_string(),
            ));
        }
        if product.num_reviews < 0 {
            return Err(DomainError::InvalidProduct(
                "Review count cannot be negative".to_string(),
            ));
        }

        Ok(product)
    }

    /// Medium after normalization
    pub fn medium(&self) -> &str {
        self.medium.as_deref().unwrap_or(DEFAULT_MEDIUM)
    }
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::InvalidProduct(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::InvalidProduct(format!(
            "{field} cannot exceed {max_len} characters"
        )));
    }
    Ok(())
}
