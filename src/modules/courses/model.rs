use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Course row. The module/lesson tree lives in `modules_json`.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub level: String,
    pub duration: String,
    pub instructor: String,
    pub price: f64,
    pub modules_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
