use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use super::model::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    Ebook,
    Template,
    Course,
    Guide,
    Design,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Ebook => "Ebook",
            ProductCategory::Template => "Template",
            ProductCategory::Course => "Course",
            ProductCategory::Guide => "Guide",
            ProductCategory::Design => "Design",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ebook" => Ok(ProductCategory::Ebook),
            "Template" => Ok(ProductCategory::Template),
            "Course" => Ok(ProductCategory::Course),
            "Guide" => Ok(ProductCategory::Guide),
            "Design" => Ok(ProductCategory::Design),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: f64,
    pub image_url: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Product> for ProductResponse {
    type Error = String;

    fn try_from(p: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            category: p.category.parse()?,
            id: p.id,
            title: p.title,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            preview_url: p.preview_url,
            download_url: p.download_url,
            created_at: p.created_at,
        })
    }
}

/// Create and update share one shape; `id` is ignored on create.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}
