use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::error::ClientResult;
use crate::modules::activity::schema::{ActivityLogResponse, LogActivityRequest, SendNotificationRequest};
use crate::modules::auth::schema::{AuthResponse, ChangePasswordRequest, RegisterRequest};
use crate::modules::courses::schema::{CourseInput, CourseResponse};
use crate::modules::enrollments::schema::{ItemType, RecordPaymentRequest};
use crate::modules::files::schema::{FileResponse, UploadFileRequest};
use crate::modules::inquiries::schema::{InquiryResponse, InquiryStatus, SubmitInquiryRequest};
use crate::modules::products::schema::{ProductInput, ProductResponse};
use crate::modules::users::model::UserStatus;
use crate::modules::users::schema::{UpdateProfileRequest, UpdateUserRequest, UserResponse};

/// Every backend operation the app can perform, independent of where the data lives.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bearer token for subsequent calls. Backends without sessions ignore it.
    fn set_session_token(&self, _token: Option<&str>) {}

    // Auth
    async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse>;
    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse>;
    async fn google_auth(&self, access_token: &str) -> ClientResult<AuthResponse>;
    async fn update_profile(&self, req: &UpdateProfileRequest) -> ClientResult<UserResponse>;
    async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<()>;

    // Users
    async fn get_users(&self) -> ClientResult<Vec<UserResponse>>;
    async fn get_user(&self, id: &str) -> ClientResult<UserResponse>;
    async fn update_user(&self, req: &UpdateUserRequest) -> ClientResult<UserResponse>;
    async fn update_user_status(&self, id: &str, status: UserStatus) -> ClientResult<()>;
    async fn delete_user(&self, id: &str) -> ClientResult<()>;

    // Products
    async fn get_products(&self) -> ClientResult<Vec<ProductResponse>>;
    async fn get_product(&self, id: &str) -> ClientResult<ProductResponse>;
    async fn create_product(&self, input: &ProductInput) -> ClientResult<ProductResponse>;
    async fn update_product(&self, input: &ProductInput) -> ClientResult<ProductResponse>;
    async fn delete_product(&self, id: &str) -> ClientResult<()>;

    // Courses
    async fn get_courses(&self) -> ClientResult<Vec<CourseResponse>>;
    async fn get_course(&self, id: &str) -> ClientResult<CourseResponse>;
    async fn create_course(&self, input: &CourseInput) -> ClientResult<CourseResponse>;
    async fn update_course(&self, input: &CourseInput) -> ClientResult<CourseResponse>;
    async fn delete_course(&self, id: &str) -> ClientResult<()>;

    // Entitlements
    async fn enroll(&self, user_id: &str, course_id: &str) -> ClientResult<()>;
    async fn get_enrollments(&self, user_id: &str) -> ClientResult<Vec<String>>;
    async fn record_payment(&self, req: &RecordPaymentRequest) -> ClientResult<()>;

    // Activity and notifications
    async fn log_activity(&self, req: &LogActivityRequest) -> ClientResult<()>;
    async fn get_activity(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>>;
    async fn send_notification(&self, req: &SendNotificationRequest) -> ClientResult<u64>;
    async fn get_notifications(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>>;

    // Inquiries
    async fn submit_inquiry(&self, req: &SubmitInquiryRequest) -> ClientResult<InquiryResponse>;
    async fn get_inquiries(&self) -> ClientResult<Vec<InquiryResponse>>;
    async fn update_inquiry_status(&self, id: &str, status: InquiryStatus) -> ClientResult<()>;
    async fn delete_inquiry(&self, id: &str) -> ClientResult<()>;

    // Hosted files
    async fn upload_file(&self, req: &UploadFileRequest) -> ClientResult<FileResponse>;
    async fn get_file(&self, id: &str) -> ClientResult<FileResponse>;
    async fn get_files(&self) -> ClientResult<Vec<FileResponse>>;
    async fn delete_file(&self, id: &str) -> ClientResult<()>;

    // Site settings
    async fn get_settings(&self) -> ClientResult<Map<String, Value>>;
    async fn update_settings(&self, key: &str, value: &Value) -> ClientResult<()>;
}

/// Write-through target for records the server returned, so they survive going offline.
/// Upserts by id; the server copy wins.
#[async_trait]
pub trait CacheMirror: Send + Sync {
    async fn mirror_users(&self, users: &[UserResponse]) -> ClientResult<()>;
    async fn mirror_courses(&self, courses: &[CourseResponse]) -> ClientResult<()>;
    async fn mirror_products(&self, products: &[ProductResponse]) -> ClientResult<()>;
    /// Stores a hash of a password the server just accepted, enabling offline sign-in.
    async fn mirror_password(&self, user_id: &str, password: &str) -> ClientResult<()>;
    /// Applies a grant the server confirmed. Unknown users are ignored.
    async fn mirror_grant(&self, user_id: &str, item_type: ItemType, item_id: &str) -> ClientResult<()>;
}

pub type SharedStorage = Arc<dyn Storage>;
