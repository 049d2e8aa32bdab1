use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::Inquiry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Contacted,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Closed => "closed",
        }
    }

    fn parse_stored(raw: &str) -> Self {
        match raw {
            "contacted" => InquiryStatus::Contacted,
            "closed" => InquiryStatus::Closed,
            _ => InquiryStatus::New,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub service_type: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Inquiry> for InquiryResponse {
    fn from(inquiry: Inquiry) -> Self {
        Self {
            status: InquiryStatus::parse_stored(&inquiry.status),
            id: inquiry.id,
            name: inquiry.name,
            email: inquiry.email,
            message: inquiry.message,
            service_type: inquiry.service_type,
            created_at: inquiry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInquiryRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
    #[validate(length(min = 1, max = 128, message = "Service type is required"))]
    pub service_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInquiryStatusRequest {
    pub id: String,
    pub status: InquiryStatus,
}
