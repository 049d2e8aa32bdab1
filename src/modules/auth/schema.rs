use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::users::model::Role;
use crate::modules::users::schema::UserResponse;

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_secret: Option<String>,
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    pub access_token: String,
}

/// Returned by register, login and Google sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_in: i64,
}

// =============================================================================
// PASSWORD
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub user_id: String,
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Admin elevation needs the shared secret; anything else quietly becomes a regular user.
pub fn resolve_role(requested: Option<Role>, provided: Option<&str>, configured: Option<&str>) -> Role {
    match (requested, provided, configured) {
        (Some(Role::Admin), Some(given), Some(expected)) if given == expected => Role::Admin,
        _ => Role::User,
    }
}
