use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub image_url: String,
    pub preview_url: Option<String>,
    pub download_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
