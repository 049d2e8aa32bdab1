use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::RwLock;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use super::storage::Storage;
use crate::modules::activity::schema::{ActivityLogResponse, LogActivityRequest, SendNotificationRequest};
use crate::modules::api::action::Action;
use crate::modules::auth::schema::{AuthResponse, ChangePasswordRequest, GoogleAuthRequest, LoginRequest, RegisterRequest};
use crate::modules::courses::schema::{CourseInput, CourseResponse};
use crate::modules::enrollments::schema::{EnrollRequest, RecordPaymentRequest};
use crate::modules::files::schema::{FileResponse, UploadFileRequest};
use crate::modules::inquiries::schema::{InquiryResponse, InquiryStatus, SubmitInquiryRequest};
use crate::modules::products::schema::{ProductInput, ProductResponse};
use crate::modules::users::model::UserStatus;
use crate::modules::users::schema::{UpdateProfileRequest, UpdateUserRequest, UserResponse};

/// Prefix of tokens minted by the local cache; they mean nothing to the server.
pub const LOCAL_TOKEN_PREFIX: &str = "local-";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    status: Option<UserStatus>,
}

#[derive(Debug, Deserialize)]
struct Delivered {
    delivered: u64,
}

/// `Storage` over the `/api?action=` HTTP endpoint.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    fn endpoint(&self, action: Action) -> String {
        format!("{}/api?action={}", self.base_url, action)
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    async fn call<T: DeserializeOwned>(&self, action: Action, body: &impl Serialize) -> ClientResult<T> {
        let mut request = self.client.post(self.endpoint(action)).json(body);
        if let Some(token) = self.current_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Unavailable(format!("unreadable response: {}", e)));
        }

        let body = response.json::<ErrorBody>().await.ok();
        Err(error_from_response(status, body))
    }

    async fn call_unit(&self, action: Action, body: &impl Serialize) -> ClientResult<()> {
        self.call::<Value>(action, body).await.map(|_| ())
    }
}

fn error_from_response(status: StatusCode, body: Option<ErrorBody>) -> ClientError {
    let (message, account_status) = match body {
        Some(ErrorBody { error, status }) => (error.unwrap_or_default(), status),
        None => (String::new(), None),
    };
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        message
    };

    if status.is_server_error() {
        return ClientError::Unavailable(message);
    }

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::UNAUTHORIZED if message == "Invalid credentials" => ClientError::InvalidCredentials,
        StatusCode::FORBIDDEN if account_status.is_some() => {
            ClientError::AccountStatus(account_status.unwrap_or_default())
        }
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Storage for RemoteStore {
    fn set_session_token(&self, token: Option<&str>) {
        // Offline sessions carry no server identity
        let token = token.filter(|t| !t.starts_with(LOCAL_TOKEN_PREFIX));
        if let Ok(mut guard) = self.token.write() {
            *guard = token.map(str::to_string);
        }
    }

    async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.call(Action::Register, req).await
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call(Action::Login, &req).await
    }

    async fn google_auth(&self, access_token: &str) -> ClientResult<AuthResponse> {
        let req = GoogleAuthRequest {
            access_token: access_token.to_string(),
        };
        self.call(Action::GoogleAuth, &req).await
    }

    async fn update_profile(&self, req: &UpdateProfileRequest) -> ClientResult<UserResponse> {
        self.call(Action::UpdateProfile, req).await
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<()> {
        self.call_unit(Action::ChangePassword, req).await
    }

    async fn get_users(&self) -> ClientResult<Vec<UserResponse>> {
        self.call(Action::GetUsers, &json!({})).await
    }

    async fn get_user(&self, id: &str) -> ClientResult<UserResponse> {
        self.call(Action::GetUser, &json!({ "id": id })).await
    }

    async fn update_user(&self, req: &UpdateUserRequest) -> ClientResult<UserResponse> {
        self.call(Action::UpdateUser, req).await
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> ClientResult<()> {
        self.call_unit(Action::UpdateUserStatus, &json!({ "id": id, "status": status }))
            .await
    }

    async fn delete_user(&self, id: &str) -> ClientResult<()> {
        self.call_unit(Action::DeleteUser, &json!({ "id": id })).await
    }

    async fn get_products(&self) -> ClientResult<Vec<ProductResponse>> {
        self.call(Action::GetProducts, &json!({})).await
    }

    async fn get_product(&self, id: &str) -> ClientResult<ProductResponse> {
        self.call(Action::GetProduct, &json!({ "id": id })).await
    }

    async fn create_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        self.call(Action::CreateProduct, input).await
    }

    async fn update_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        self.call(Action::UpdateProduct, input).await
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.call_unit(Action::DeleteProduct, &json!({ "id": id })).await
    }

    async fn get_courses(&self) -> ClientResult<Vec<CourseResponse>> {
        self.call(Action::GetCourses, &json!({})).await
    }

    async fn get_course(&self, id: &str) -> ClientResult<CourseResponse> {
        self.call(Action::GetCourse, &json!({ "id": id })).await
    }

    async fn create_course(&self, input: &CourseInput) -> ClientResult<CourseResponse> {
        self.call(Action::CreateCourse, input).await
    }

    async fn update_course(&self, input: &CourseInput) -> ClientResult<CourseResponse> {
        self.call(Action::UpdateCourse, input).await
    }

    async fn delete_course(&self, id: &str) -> ClientResult<()> {
        self.call_unit(Action::DeleteCourse, &json!({ "id": id })).await
    }

    async fn enroll(&self, user_id: &str, course_id: &str) -> ClientResult<()> {
        let req = EnrollRequest {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
        };
        self.call_unit(Action::Enroll, &req).await
    }

    async fn get_enrollments(&self, user_id: &str) -> ClientResult<Vec<String>> {
        self.call(Action::GetEnrollments, &json!({ "userId": user_id })).await
    }

    async fn record_payment(&self, req: &RecordPaymentRequest) -> ClientResult<()> {
        self.call_unit(Action::RecordPayment, req).await
    }

    async fn log_activity(&self, req: &LogActivityRequest) -> ClientResult<()> {
        self.call_unit(Action::LogActivity, req).await
    }

    async fn get_activity(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>> {
        self.call(Action::GetActivity, &json!({ "userId": user_id })).await
    }

    async fn send_notification(&self, req: &SendNotificationRequest) -> ClientResult<u64> {
        let result: Delivered = self.call(Action::SendNotification, req).await?;
        Ok(result.delivered)
    }

    async fn get_notifications(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>> {
        self.call(Action::GetNotifications, &json!({ "userId": user_id })).await
    }

    async fn submit_inquiry(&self, req: &SubmitInquiryRequest) -> ClientResult<InquiryResponse> {
        self.call(Action::SubmitInquiry, req).await
    }

    async fn get_inquiries(&self) -> ClientResult<Vec<InquiryResponse>> {
        self.call(Action::GetInquiries, &json!({})).await
    }

    async fn update_inquiry_status(&self, id: &str, status: InquiryStatus) -> ClientResult<()> {
        self.call_unit(Action::UpdateInquiryStatus, &json!({ "id": id, "status": status }))
            .await
    }

    async fn delete_inquiry(&self, id: &str) -> ClientResult<()> {
        self.call_unit(Action::DeleteInquiry, &json!({ "id": id })).await
    }

    async fn upload_file(&self, req: &UploadFileRequest) -> ClientResult<FileResponse> {
        self.call(Action::UploadFile, req).await
    }

    async fn get_file(&self, id: &str) -> ClientResult<FileResponse> {
        self.call(Action::GetFile, &json!({ "id": id })).await
    }

    async fn get_files(&self) -> ClientResult<Vec<FileResponse>> {
        self.call(Action::GetFiles, &json!({})).await
    }

    async fn delete_file(&self, id: &str) -> ClientResult<()> {
        self.call_unit(Action::DeleteFile, &json!({ "id": id })).await
    }

    async fn get_settings(&self) -> ClientResult<Map<String, Value>> {
        self.call(Action::GetSettings, &json!({})).await
    }

    async fn update_settings(&self, key: &str, value: &Value) -> ClientResult<()> {
        self.call_unit(Action::UpdateSettings, &json!({ "key": key, "value": value }))
            .await
    }
}
