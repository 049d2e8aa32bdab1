use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SiteSetting {
    pub setting_key: String,
    pub value_json: String,
    pub updated_at: DateTime<Utc>,
}
