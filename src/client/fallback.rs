use async_trait::async_trait;
use serde_json::{Map, Value};
use std::slice;

use super::error::ClientResult;
use super::storage::{CacheMirror, Storage};
use crate::modules::activity::schema::{ActivityLogResponse, LogActivityRequest, SendNotificationRequest};
use crate::modules::auth::schema::{AuthResponse, ChangePasswordRequest, RegisterRequest};
use crate::modules::courses::schema::{CourseInput, CourseResponse};
use crate::modules::enrollments::schema::{ItemType, RecordPaymentRequest};
use crate::modules::files::schema::{FileResponse, UploadFileRequest};
use crate::modules::inquiries::schema::{InquiryResponse, InquiryStatus, SubmitInquiryRequest};
use crate::modules::products::schema::{ProductInput, ProductResponse};
use crate::modules::users::model::UserStatus;
use crate::modules::users::schema::{UpdateProfileRequest, UpdateUserRequest, UserResponse};

/// Runs `$call` against the primary store and repeats it on the secondary
/// when the primary is unreachable. Any other error is returned as-is.
/// With a `mirror` clause, a primary success is also written into the secondary.
macro_rules! with_fallback {
    ($self:ident, $op:literal, |$store:ident| $call:expr, mirror |$value:ident| $mirror:expr) => {{
        let result = {
            let $store = &$self.primary;
            $call.await
        };
        match result {
            Ok($value) => {
                if let Err(e) = $mirror.await {
                    tracing::warn!(operation = $op, error = %e, "failed to mirror into local cache");
                }
                Ok($value)
            }
            Err(e) if e.is_unavailable() => {
                tracing::warn!(operation = $op, error = %e, "primary storage unavailable, falling back");
                let $store = &$self.secondary;
                $call.await
            }
            Err(e) => Err(e),
        }
    }};
    ($self:ident, $op:literal, |$store:ident| $call:expr) => {{
        let result = {
            let $store = &$self.primary;
            $call.await
        };
        match result {
            Err(e) if e.is_unavailable() => {
                tracing::warn!(operation = $op, error = %e, "primary storage unavailable, falling back");
                let $store = &$self.secondary;
                $call.await
            }
            other => other,
        }
    }};
}

pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Storage, S: Storage> FallbackStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

#[async_trait]
impl<P: Storage, S: Storage + CacheMirror> Storage for FallbackStore<P, S> {
    fn set_session_token(&self, token: Option<&str>) {
        self.primary.set_session_token(token);
        self.secondary.set_session_token(token);
    }

    async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse> {
        with_fallback!(self, "register", |s| s.register(req), mirror |auth| async {
            self.secondary.mirror_users(slice::from_ref(&auth.user)).await?;
            self.secondary.mirror_password(&auth.user.id, &req.password).await
        })
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        with_fallback!(self, "login", |s| s.login(email, password), mirror |auth| async {
            self.secondary.mirror_users(slice::from_ref(&auth.user)).await?;
            self.secondary.mirror_password(&auth.user.id, password).await
        })
    }

    async fn google_auth(&self, access_token: &str) -> ClientResult<AuthResponse> {
        with_fallback!(self, "googleAuth", |s| s.google_auth(access_token), mirror |auth| {
            self.secondary.mirror_users(slice::from_ref(&auth.user))
        })
    }

    async fn update_profile(&self, req: &UpdateProfileRequest) -> ClientResult<UserResponse> {
        with_fallback!(self, "updateProfile", |s| s.update_profile(req), mirror |user| {
            self.secondary.mirror_users(slice::from_ref(&user))
        })
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<()> {
        with_fallback!(self, "changePassword", |s| s.change_password(req), mirror |done| async {
            self.secondary.mirror_password(&req.user_id, &req.new_password).await
        })
    }

    async fn get_users(&self) -> ClientResult<Vec<UserResponse>> {
        with_fallback!(self, "getUsers", |s| s.get_users(), mirror |users| {
            self.secondary.mirror_users(&users)
        })
    }

    async fn get_user(&self, id: &str) -> ClientResult<UserResponse> {
        with_fallback!(self, "getUser", |s| s.get_user(id), mirror |user| {
            self.secondary.mirror_users(slice::from_ref(&user))
        })
    }

    async fn update_user(&self, req: &UpdateUserRequest) -> ClientResult<UserResponse> {
        with_fallback!(self, "updateUser", |s| s.update_user(req), mirror |user| {
            self.secondary.mirror_users(slice::from_ref(&user))
        })
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> ClientResult<()> {
        with_fallback!(self, "updateUserStatus", |s| s.update_user_status(id, status))
    }

    async fn delete_user(&self, id: &str) -> ClientResult<()> {
        with_fallback!(self, "deleteUser", |s| s.delete_user(id))
    }

    async fn get_products(&self) -> ClientResult<Vec<ProductResponse>> {
        with_fallback!(self, "getProducts", |s| s.get_products(), mirror |products| {
            self.secondary.mirror_products(&products)
        })
    }

    async fn get_product(&self, id: &str) -> ClientResult<ProductResponse> {
        with_fallback!(self, "getProduct", |s| s.get_product(id), mirror |product| {
            self.secondary.mirror_products(slice::from_ref(&product))
        })
    }

    async fn create_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        with_fallback!(self, "createProduct", |s| s.create_product(input), mirror |product| {
            self.secondary.mirror_products(slice::from_ref(&product))
        })
    }

    async fn update_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        with_fallback!(self, "updateProduct", |s| s.update_product(input), mirror |product| {
            self.secondary.mirror_products(slice::from_ref(&product))
        })
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        with_fallback!(self, "deleteProduct", |s| s.delete_product(id))
    }

    async fn get_courses(&self) -> ClientResult<Vec<CourseResponse>> {
        with_fallback!(self, "getCourses", |s| s.get_courses(), mirror |courses| {
            self.secondary.mirror_courses(&courses)
        })
    }

    async fn get_course(&self, id: &str) -> ClientResult<CourseResponse> {
        with_fallback!(self, "getCourse", |s| s.get_course(id), mirror |course| {
            self.secondary.mirror_courses(slice::from_ref(&course))
        })
    }

    async fn create_course(&self, input: &CourseInput) -> ClientResult<CourseResponse> {
        with_fallback!(self, "createCourse", |s| s.create_course(input), mirror |course| {
            self.secondary.mirror_courses(slice::from_ref(&course))
        })
    }

    async fn update_course(&self, input: &CourseInput) -> ClientResult<CourseResponse> {
        with_fallback!(self, "updateCourse", |s| s.update_course(input), mirror |course| {
            self.secondary.mirror_courses(slice::from_ref(&course))
        })
    }

    async fn delete_course(&self, id: &str) -> ClientResult<()> {
        with_fallback!(self, "deleteCourse", |s| s.delete_course(id))
    }

    async fn enroll(&self, user_id: &str, course_id: &str) -> ClientResult<()> {
        with_fallback!(self, "enroll", |s| s.enroll(user_id, course_id), mirror |done| async {
            self.secondary.mirror_grant(user_id, ItemType::Course, course_id).await
        })
    }

    async fn get_enrollments(&self, user_id: &str) -> ClientResult<Vec<String>> {
        with_fallback!(self, "getEnrollments", |s| s.get_enrollments(user_id))
    }

    async fn record_payment(&self, req: &RecordPaymentRequest) -> ClientResult<()> {
        with_fallback!(self, "recordPayment", |s| s.record_payment(req), mirror |done| async {
            self.secondary.mirror_grant(&req.user_id, req.item_type, &req.item_id).await
        })
    }

    async fn log_activity(&self, req: &LogActivityRequest) -> ClientResult<()> {
        with_fallback!(self, "logActivity", |s| s.log_activity(req))
    }

    async fn get_activity(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>> {
        with_fallback!(self, "getActivity", |s| s.get_activity(user_id))
    }

    async fn send_notification(&self, req: &SendNotificationRequest) -> ClientResult<u64> {
        with_fallback!(self, "sendNotification", |s| s.send_notification(req))
    }

    async fn get_notifications(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>> {
        with_fallback!(self, "getNotifications", |s| s.get_notifications(user_id))
    }

    async fn submit_inquiry(&self, req: &SubmitInquiryRequest) -> ClientResult<InquiryResponse> {
        with_fallback!(self, "submitInquiry", |s| s.submit_inquiry(req))
    }

    async fn get_inquiries(&self) -> ClientResult<Vec<InquiryResponse>> {
        with_fallback!(self, "getInquiries", |s| s.get_inquiries())
    }

    async fn update_inquiry_status(&self, id: &str, status: InquiryStatus) -> ClientResult<()> {
        with_fallback!(self, "updateInquiryStatus", |s| s.update_inquiry_status(id, status))
    }

    async fn delete_inquiry(&self, id: &str) -> ClientResult<()> {
        with_fallback!(self, "deleteInquiry", |s| s.delete_inquiry(id))
    }

    async fn upload_file(&self, req: &UploadFileRequest) -> ClientResult<FileResponse> {
        with_fallback!(self, "uploadFile", |s| s.upload_file(req))
    }

    async fn get_file(&self, id: &str) -> ClientResult<FileResponse> {
        with_fallback!(self, "getFile", |s| s.get_file(id))
    }

    async fn get_files(&self) -> ClientResult<Vec<FileResponse>> {
        with_fallback!(self, "getFiles", |s| s.get_files())
    }

    async fn delete_file(&self, id: &str) -> ClientResult<()> {
        with_fallback!(self, "deleteFile", |s| s.delete_file(id))
    }

    async fn get_settings(&self) -> ClientResult<Map<String, Value>> {
        with_fallback!(self, "getSettings", |s| s.get_settings())
    }

    async fn update_settings(&self, key: &str, value: &Value) -> ClientResult<()> {
        with_fallback!(self, "updateSettings", |s| s.update_settings(key, value))
    }
}
