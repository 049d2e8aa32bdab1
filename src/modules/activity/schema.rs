use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::ActivityLog;

/// Reads return at most this many entries, newest first.
pub const ACTIVITY_READ_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Auth,
    Purchase,
    Enrollment,
    Profile,
    Admin,
    Notification,
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Auth => "auth",
            ActivityType::Purchase => "purchase",
            ActivityType::Enrollment => "enrollment",
            ActivityType::Profile => "profile",
            ActivityType::Admin => "admin",
            ActivityType::Notification => "notification",
            ActivityType::Other => "other",
        }
    }

    pub fn parse_stored(raw: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(raw.to_string())).unwrap_or(ActivityType::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogResponse {
    pub id: i64,
    pub user_id: String,
    pub action: String,
    pub description: String,
    #[serde(rename = "type")]
    pub log_type: ActivityType,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLog> for ActivityLogResponse {
    fn from(log: ActivityLog) -> Self {
        Self {
            log_type: ActivityType::parse_stored(&log.log_type),
            id: log.id,
            user_id: log.user_id,
            action: log.action,
            description: log.description,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogActivityRequest {
    pub user_id: String,
    #[validate(length(min = 1, max = 255, message = "Action is required"))]
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub log_type: ActivityType,
}

/// Admin broadcast. Without a user id it is delivered to every user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}
