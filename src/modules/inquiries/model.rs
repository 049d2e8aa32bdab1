use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub service_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
