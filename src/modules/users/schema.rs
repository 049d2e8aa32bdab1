use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{Role, User, UserStatus};

// =============================================================================
// USER (wire shape shared by server and client)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub balance: f64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub purchased_products: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_model(user: User, enrolled_courses: Vec<String>) -> Self {
        let purchased_products = user.purchased_product_ids();
        Self {
            role: user.role(),
            status: user.status(),
            id: user.id,
            name: user.name,
            email: user.email,
            balance: user.balance,
            avatar: user.avatar,
            enrolled_courses,
            purchased_products,
            created_at: user.created_at,
        }
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|id| id == course_id)
    }

    pub fn owns_product(&self, product_id: &str) -> bool {
        self.purchased_products.iter().any(|id| id == product_id)
    }
}

// =============================================================================
// ADMIN UPDATES
// =============================================================================

/// Full user record update from the back office. Entitlement arrays replace the stored ones.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[validate(range(min = 0.0, message = "Balance cannot be negative"))]
    pub balance: f64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub purchased_products: Vec<String>,
}

impl From<&UserResponse> for UpdateUserRequest {
    fn from(user: &UserResponse) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            balance: user.balance,
            avatar: user.avatar.clone(),
            enrolled_courses: user.enrolled_courses.clone(),
            purchased_products: user.purchased_products.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub id: String,
    pub status: UserStatus,
}

// =============================================================================
// PROFILE (self service)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub user_id: String,
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub avatar: Option<String>,
}
