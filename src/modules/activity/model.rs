use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: String,
    pub action: String,
    pub description: String,
    pub log_type: String,
    pub created_at: DateTime<Utc>,
}
