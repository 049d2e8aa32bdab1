use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub user_id: String,
    pub course_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Course,
    Product,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Course => "course",
            ItemType::Product => "product",
        }
    }
}

/// Sent by the checkout success callback. The reference comes from the payment
/// overlay and is not verified server side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub user_id: String,
    pub item_type: ItemType,
    pub item_id: String,
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
    #[validate(length(min = 1, max = 128, message = "Payment reference is required"))]
    pub reference: String,
}

impl RecordPaymentRequest {
    pub fn activity_description(&self, item_title: &str) -> String {
        format!(
            "Paid {:.2} {} for {} \"{}\" (ref {})",
            self.amount,
            self.currency.to_ascii_uppercase(),
            self.item_type.as_str(),
            item_title,
            self.reference
        )
    }
}
