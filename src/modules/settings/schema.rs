use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Keys written by the admin SEO and settings tabs. Other keys are accepted as-is.
pub const SEO_KEY: &str = "seo";
pub const SITE_KEY: &str = "site";
pub const ANNOUNCEMENT_KEY: &str = "announcement";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 64, message = "Setting key is required"))]
    pub key: String,
    pub value: Value,
}
