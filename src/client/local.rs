use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use super::error::{ClientError, ClientResult};
use super::local_storage::{read_json, write_json, LocalStorage};
use super::remote::LOCAL_TOKEN_PREFIX;
use super::storage::{CacheMirror, Storage};
use crate::modules::activity::schema::{
    ActivityLogResponse, ActivityType, LogActivityRequest, SendNotificationRequest, ACTIVITY_READ_LIMIT,
};
use crate::modules::auth::controller::normalize_email;
use crate::modules::auth::schema::{resolve_role, AuthResponse, ChangePasswordRequest, RegisterRequest};
use crate::modules::courses::schema::{validate_structure, CourseInput, CourseResponse};
use crate::modules::enrollments::schema::{ItemType, RecordPaymentRequest};
use crate::modules::files::schema::{FileResponse, UploadFileRequest};
use crate::modules::inquiries::schema::{InquiryResponse, InquiryStatus, SubmitInquiryRequest};
use crate::modules::products::schema::{ProductInput, ProductResponse};
use crate::modules::users::model::UserStatus;
use crate::modules::users::schema::{UpdateProfileRequest, UpdateUserRequest, UserResponse};
use crate::services::{data_url, hashing};

pub const USERS_KEY: &str = "nexlify_users";
pub const PRODUCTS_KEY: &str = "nexlify_products";
pub const COURSES_KEY: &str = "nexlify_courses";
pub const ACTIVITY_KEY: &str = "nexlify_activity";
pub const INQUIRIES_KEY: &str = "nexlify_inquiries";
pub const FILES_KEY: &str = "nexlify_files";
pub const SETTINGS_KEY: &str = "nexlify_settings";

/// User as kept in the local cache. Google accounts have no password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalUser {
    #[serde(flatten)]
    profile: UserResponse,
    #[serde(default)]
    password_hash: Option<String>,
}

/// Full `Storage` implementation over a `LocalStorage`, used offline and as the fallback target.
pub struct LocalCacheStore {
    storage: Arc<dyn LocalStorage>,
    admin_secret: Option<String>,
    write_lock: Mutex<()>,
}

impl LocalCacheStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            admin_secret: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_admin_secret(mut self, secret: Option<String>) -> Self {
        self.admin_secret = secret.filter(|s| !s.trim().is_empty());
        self
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> ClientResult<T> {
        Ok(read_json(self.storage.as_ref(), key)?.unwrap_or_default())
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> ClientResult<()> {
        write_json(self.storage.as_ref(), key, value)
    }

    fn users(&self) -> ClientResult<Vec<LocalUser>> {
        self.load(USERS_KEY)
    }

    fn find_user(&self, id: &str) -> ClientResult<LocalUser> {
        self.users()?
            .into_iter()
            .find(|u| u.profile.id == id)
            .ok_or_else(|| ClientError::not_found("User"))
    }

    fn session_for(user: UserResponse) -> AuthResponse {
        AuthResponse {
            user,
            token: format!("{}{}", LOCAL_TOKEN_PREFIX, Uuid::new_v4()),
            expires_in: 0,
        }
    }

    fn append_activity(
        &self,
        user_id: &str,
        action: &str,
        description: &str,
        log_type: ActivityType,
    ) -> ClientResult<()> {
        let mut logs: Vec<ActivityLogResponse> = self.load(ACTIVITY_KEY)?;
        push_activity(&mut logs, user_id, action, description, log_type);
        self.save(ACTIVITY_KEY, &logs)
    }

    fn read_feed(&self, user_id: &str, notifications: bool) -> ClientResult<Vec<ActivityLogResponse>> {
        let logs: Vec<ActivityLogResponse> = self.load(ACTIVITY_KEY)?;
        Ok(logs
            .into_iter()
            .rev()
            .filter(|log| log.user_id == user_id && is_notification(log) == notifications)
            .take(ACTIVITY_READ_LIMIT)
            .collect())
    }

    fn grant(&self, user_id: &str, item_type: ItemType, item_id: &str) -> ClientResult<bool> {
        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.profile.id == user_id)
            .ok_or_else(|| ClientError::not_found("User"))?;

        let list = match item_type {
            ItemType::Course => &mut user.profile.enrolled_courses,
            ItemType::Product => &mut user.profile.purchased_products,
        };
        if list.iter().any(|id| id == item_id) {
            return Ok(false);
        }
        list.push(item_id.to_string());

        self.save(USERS_KEY, &users)?;
        Ok(true)
    }

    fn upsert_by_id<T>(&self, key: &str, fresh: &[T], id: impl Fn(&T) -> &str) -> ClientResult<()>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let mut current: Vec<T> = self.load(key)?;
        for item in fresh {
            match current.iter_mut().find(|existing| id(existing) == id(item)) {
                Some(slot) => *slot = item.clone(),
                None => current.push(item.clone()),
            }
        }
        self.save(key, &current)
    }

    fn course_title(&self, id: &str) -> ClientResult<String> {
        let courses: Vec<CourseResponse> = self.load(COURSES_KEY)?;
        courses
            .into_iter()
            .find(|c| c.id == id)
            .map(|c| c.title)
            .ok_or_else(|| ClientError::not_found("Course"))
    }

    fn product_title(&self, id: &str) -> ClientResult<String> {
        let products: Vec<ProductResponse> = self.load(PRODUCTS_KEY)?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .map(|p| p.title)
            .ok_or_else(|| ClientError::not_found("Product"))
    }
}

fn is_notification(log: &ActivityLogResponse) -> bool {
    log.log_type == ActivityType::Notification
}

/// Appends in chronological order and drops the oldest entries past the read limit.
fn push_activity(
    logs: &mut Vec<ActivityLogResponse>,
    user_id: &str,
    action: &str,
    description: &str,
    log_type: ActivityType,
) {
    let id = logs.iter().map(|log| log.id).max().unwrap_or(0) + 1;
    logs.push(ActivityLogResponse {
        id,
        user_id: user_id.to_string(),
        action: action.to_string(),
        description: description.to_string(),
        log_type,
        created_at: Utc::now(),
    });

    let notification = log_type == ActivityType::Notification;
    let same_feed = |log: &ActivityLogResponse| log.user_id == user_id && is_notification(log) == notification;
    let mut excess = logs.iter().filter(|log| same_feed(log)).count().saturating_sub(ACTIVITY_READ_LIMIT);
    logs.retain(|log| {
        if excess > 0 && same_feed(log) {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

/// Refills answer keys that a redacted server copy left out, from the cached copy.
fn keep_answer_keys(mut fresh: CourseResponse, cached: &CourseResponse) -> CourseResponse {
    let known: HashMap<(&str, &str), usize> = cached
        .modules
        .iter()
        .flat_map(|module| module.lessons.iter())
        .flat_map(|lesson| {
            lesson
                .questions()
                .iter()
                .filter_map(move |q| q.correct_answer.map(|a| ((lesson.id.as_str(), q.id.as_str()), a)))
        })
        .collect();

    for lesson in fresh.modules.iter_mut().flat_map(|module| module.lessons.iter_mut()) {
        let lesson_id = lesson.id.clone();
        for question in lesson.questions.iter_mut().flatten() {
            if question.correct_answer.is_none() {
                question.correct_answer = known.get(&(lesson_id.as_str(), question.id.as_str())).copied();
            }
        }
    }
    fresh
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

fn product_from_input(id: String, input: &ProductInput, created_at: chrono::DateTime<Utc>) -> ProductResponse {
    ProductResponse {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        category: input.category,
        price: input.price,
        image_url: input.image_url.clone(),
        preview_url: input.preview_url.clone(),
        download_url: input.download_url.clone(),
        created_at,
    }
}

fn course_from_input(id: String, input: &CourseInput, created_at: chrono::DateTime<Utc>) -> CourseResponse {
    CourseResponse {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        thumbnail: input.thumbnail.clone(),
        level: input.level.clone(),
        duration: input.duration.clone(),
        instructor: input.instructor.clone(),
        price: input.price,
        modules: input.modules.clone(),
        created_at,
    }
}

fn checked_course(input: &CourseInput) -> ClientResult<()> {
    input.validate()?;
    validate_structure(&input.modules).map_err(ClientError::Validation)
}

#[async_trait]
impl Storage for LocalCacheStore {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        let email = normalize_email(&req.email);
        let mut users = self.users()?;
        if users.iter().any(|u| u.profile.email == email) {
            return Err(ClientError::Conflict("Email already exists".to_string()));
        }

        let role = resolve_role(req.role, req.admin_secret.as_deref(), self.admin_secret.as_deref());
        let profile = UserResponse {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            email,
            role,
            status: UserStatus::Active,
            balance: 0.0,
            avatar: None,
            enrolled_courses: Vec::new(),
            purchased_products: Vec::new(),
            created_at: Utc::now(),
        };
        users.push(LocalUser {
            profile: profile.clone(),
            password_hash: Some(hashing::hash_password(&req.password)?),
        });
        self.save(USERS_KEY, &users)?;
        self.append_activity(&profile.id, "Registered", "Account created", ActivityType::Auth)?;

        tracing::debug!(user_id = %profile.id, "registered in local cache");
        Ok(Self::session_for(profile))
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let email = normalize_email(email);
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.profile.email == email)
            .ok_or(ClientError::InvalidCredentials)?;

        let hash = user.password_hash.as_deref().ok_or(ClientError::InvalidCredentials)?;
        if !hashing::verify_password(password, hash)? {
            return Err(ClientError::InvalidCredentials);
        }
        if !user.profile.status.can_sign_in() {
            return Err(ClientError::AccountStatus(user.profile.status));
        }

        Ok(Self::session_for(user.profile))
    }

    async fn google_auth(&self, _access_token: &str) -> ClientResult<AuthResponse> {
        Err(ClientError::Unavailable("Google sign-in requires a connection".to_string()))
    }

    async fn update_profile(&self, req: &UpdateProfileRequest) -> ClientResult<UserResponse> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.profile.id == req.user_id)
            .ok_or_else(|| ClientError::not_found("User"))?;
        if let Some(name) = &req.name {
            user.profile.name = name.trim().to_string();
        }
        if let Some(avatar) = &req.avatar {
            user.profile.avatar = Some(avatar.clone());
        }
        let profile = user.profile.clone();

        self.save(USERS_KEY, &users)?;
        Ok(profile)
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<()> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.profile.id == req.user_id)
            .ok_or_else(|| ClientError::not_found("User"))?;
        let current = user.password_hash.as_deref().ok_or(ClientError::InvalidCredentials)?;
        if !hashing::verify_password(&req.current_password, current)? {
            return Err(ClientError::InvalidCredentials);
        }
        user.password_hash = Some(hashing::hash_password(&req.new_password)?);

        self.save(USERS_KEY, &users)
    }

    async fn get_users(&self) -> ClientResult<Vec<UserResponse>> {
        Ok(self.users()?.into_iter().map(|u| u.profile).collect())
    }

    async fn get_user(&self, id: &str) -> ClientResult<UserResponse> {
        Ok(self.find_user(id)?.profile)
    }

    async fn update_user(&self, req: &UpdateUserRequest) -> ClientResult<UserResponse> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        let email = normalize_email(&req.email);
        let mut users = self.users()?;
        if users.iter().any(|u| u.profile.email == email && u.profile.id != req.id) {
            return Err(ClientError::Conflict("Email already exists".to_string()));
        }

        let user = users
            .iter_mut()
            .find(|u| u.profile.id == req.id)
            .ok_or_else(|| ClientError::not_found("User"))?;
        user.profile.name = req.name.trim().to_string();
        user.profile.email = email;
        user.profile.role = req.role;
        user.profile.status = req.status;
        user.profile.balance = req.balance;
        user.profile.avatar = req.avatar.clone();
        user.profile.enrolled_courses = dedup(&req.enrolled_courses);
        user.profile.purchased_products = dedup(&req.purchased_products);
        let profile = user.profile.clone();

        self.save(USERS_KEY, &users)?;
        Ok(profile)
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.profile.id == id)
            .ok_or_else(|| ClientError::not_found("User"))?;
        user.profile.status = status;

        self.save(USERS_KEY, &users)?;
        let description = format!("Account status set to {}", status.as_str());
        self.append_activity(id, "Status changed", &description, ActivityType::Admin)
    }

    async fn delete_user(&self, id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.users()?;
        let before = users.len();
        users.retain(|u| u.profile.id != id);
        if users.len() == before {
            return Err(ClientError::not_found("User"));
        }
        self.save(USERS_KEY, &users)?;

        let mut logs: Vec<ActivityLogResponse> = self.load(ACTIVITY_KEY)?;
        logs.retain(|log| log.user_id != id);
        self.save(ACTIVITY_KEY, &logs)
    }

    async fn get_products(&self) -> ClientResult<Vec<ProductResponse>> {
        self.load(PRODUCTS_KEY)
    }

    async fn get_product(&self, id: &str) -> ClientResult<ProductResponse> {
        let products: Vec<ProductResponse> = self.load(PRODUCTS_KEY)?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::not_found("Product"))
    }

    async fn create_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        input.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut products: Vec<ProductResponse> = self.load(PRODUCTS_KEY)?;
        let product = product_from_input(Uuid::new_v4().to_string(), input, Utc::now());
        products.insert(0, product.clone());

        self.save(PRODUCTS_KEY, &products)?;
        Ok(product)
    }

    async fn update_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        input.validate()?;
        let id = input
            .id
            .as_deref()
            .ok_or_else(|| ClientError::Validation("Product id is required".to_string()))?;
        let _guard = self.write_lock.lock().await;

        let mut products: Vec<ProductResponse> = self.load(PRODUCTS_KEY)?;
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::not_found("Product"))?;
        *slot = product_from_input(id.to_string(), input, slot.created_at);
        let product = slot.clone();

        self.save(PRODUCTS_KEY, &products)?;
        Ok(product)
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut products: Vec<ProductResponse> = self.load(PRODUCTS_KEY)?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(ClientError::not_found("Product"));
        }
        self.save(PRODUCTS_KEY, &products)
    }

    async fn get_courses(&self) -> ClientResult<Vec<CourseResponse>> {
        self.load(COURSES_KEY)
    }

    async fn get_course(&self, id: &str) -> ClientResult<CourseResponse> {
        let courses: Vec<CourseResponse> = self.load(COURSES_KEY)?;
        courses
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::not_found("Course"))
    }

    async fn create_course(&self, input: &CourseInput) -> ClientResult<CourseResponse> {
        checked_course(input)?;
        let _guard = self.write_lock.lock().await;

        let mut courses: Vec<CourseResponse> = self.load(COURSES_KEY)?;
        let course = course_from_input(Uuid::new_v4().to_string(), input, Utc::now());
        courses.insert(0, course.clone());

        self.save(COURSES_KEY, &courses)?;
        Ok(course)
    }

    async fn update_course(&self, input: &CourseInput) -> ClientResult<CourseResponse> {
        checked_course(input)?;
        let id = input
            .id
            .as_deref()
            .ok_or_else(|| ClientError::Validation("Course id is required".to_string()))?;
        let _guard = self.write_lock.lock().await;

        let mut courses: Vec<CourseResponse> = self.load(COURSES_KEY)?;
        let slot = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::not_found("Course"))?;
        *slot = course_from_input(id.to_string(), input, slot.created_at);
        let course = slot.clone();

        self.save(COURSES_KEY, &courses)?;
        Ok(course)
    }

    async fn delete_course(&self, id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut courses: Vec<CourseResponse> = self.load(COURSES_KEY)?;
        let before = courses.len();
        courses.retain(|c| c.id != id);
        if courses.len() == before {
            return Err(ClientError::not_found("Course"));
        }

        let mut users = self.users()?;
        for user in users.iter_mut() {
            user.profile.enrolled_courses.retain(|course_id| course_id != id);
        }
        self.save(USERS_KEY, &users)?;
        self.save(COURSES_KEY, &courses)
    }

    async fn enroll(&self, user_id: &str, course_id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let title = self.course_title(course_id)?;
        if self.grant(user_id, ItemType::Course, course_id)? {
            let description = format!("Enrolled in \"{}\"", title);
            self.append_activity(user_id, "Course enrollment", &description, ActivityType::Enrollment)?;
        }
        Ok(())
    }

    async fn get_enrollments(&self, user_id: &str) -> ClientResult<Vec<String>> {
        Ok(self.find_user(user_id)?.profile.enrolled_courses)
    }

    async fn record_payment(&self, req: &RecordPaymentRequest) -> ClientResult<()> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        self.find_user(&req.user_id)?;
        let title = match req.item_type {
            ItemType::Course => self.course_title(&req.item_id)?,
            ItemType::Product => self.product_title(&req.item_id)?,
        };
        self.grant(&req.user_id, req.item_type, &req.item_id)?;
        self.append_activity(&req.user_id, "Payment", &req.activity_description(&title), ActivityType::Purchase)
    }

    async fn log_activity(&self, req: &LogActivityRequest) -> ClientResult<()> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;
        self.append_activity(&req.user_id, &req.action, &req.description, req.log_type)
    }

    async fn get_activity(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>> {
        self.read_feed(user_id, false)
    }

    async fn send_notification(&self, req: &SendNotificationRequest) -> ClientResult<u64> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        let recipients: Vec<String> = match &req.user_id {
            Some(user_id) => vec![self.find_user(user_id)?.profile.id],
            None => self.users()?.into_iter().map(|u| u.profile.id).collect(),
        };

        let mut logs: Vec<ActivityLogResponse> = self.load(ACTIVITY_KEY)?;
        for user_id in &recipients {
            push_activity(&mut logs, user_id, &req.title, &req.message, ActivityType::Notification);
        }
        self.save(ACTIVITY_KEY, &logs)?;

        Ok(recipients.len() as u64)
    }

    async fn get_notifications(&self, user_id: &str) -> ClientResult<Vec<ActivityLogResponse>> {
        self.read_feed(user_id, true)
    }

    async fn submit_inquiry(&self, req: &SubmitInquiryRequest) -> ClientResult<InquiryResponse> {
        req.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut inquiries: Vec<InquiryResponse> = self.load(INQUIRIES_KEY)?;
        let inquiry = InquiryResponse {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            message: req.message.clone(),
            service_type: req.service_type.clone(),
            status: InquiryStatus::New,
            created_at: Utc::now(),
        };
        inquiries.insert(0, inquiry.clone());

        self.save(INQUIRIES_KEY, &inquiries)?;
        Ok(inquiry)
    }

    async fn get_inquiries(&self) -> ClientResult<Vec<InquiryResponse>> {
        self.load(INQUIRIES_KEY)
    }

    async fn update_inquiry_status(&self, id: &str, status: InquiryStatus) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut inquiries: Vec<InquiryResponse> = self.load(INQUIRIES_KEY)?;
        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ClientError::not_found("Inquiry"))?;
        inquiry.status = status;

        self.save(INQUIRIES_KEY, &inquiries)
    }

    async fn delete_inquiry(&self, id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut inquiries: Vec<InquiryResponse> = self.load(INQUIRIES_KEY)?;
        let before = inquiries.len();
        inquiries.retain(|i| i.id != id);
        if inquiries.len() == before {
            return Err(ClientError::not_found("Inquiry"));
        }
        self.save(INQUIRIES_KEY, &inquiries)
    }

    async fn upload_file(&self, req: &UploadFileRequest) -> ClientResult<FileResponse> {
        req.validate()?;
        let decoded = data_url::decode(&req.data_url).map_err(|e| ClientError::Validation(e.to_string()))?;
        let _guard = self.write_lock.lock().await;

        let mut files: Vec<FileResponse> = self.load(FILES_KEY)?;
        let file = FileResponse {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            mime_type: decoded.mime_type,
            size: decoded.bytes.len() as i64,
            data_url: Some(req.data_url.trim().to_string()),
            created_at: Utc::now(),
        };
        files.insert(0, file.clone());
        self.save(FILES_KEY, &files)?;

        Ok(FileResponse { data_url: None, ..file })
    }

    async fn get_file(&self, id: &str) -> ClientResult<FileResponse> {
        let files: Vec<FileResponse> = self.load(FILES_KEY)?;
        files
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| ClientError::not_found("File"))
    }

    async fn get_files(&self) -> ClientResult<Vec<FileResponse>> {
        let files: Vec<FileResponse> = self.load(FILES_KEY)?;
        Ok(files
            .into_iter()
            .map(|f| FileResponse { data_url: None, ..f })
            .collect())
    }

    async fn delete_file(&self, id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut files: Vec<FileResponse> = self.load(FILES_KEY)?;
        let before = files.len();
        files.retain(|f| f.id != id);
        if files.len() == before {
            return Err(ClientError::not_found("File"));
        }
        self.save(FILES_KEY, &files)
    }

    async fn get_settings(&self) -> ClientResult<Map<String, Value>> {
        self.load(SETTINGS_KEY)
    }

    async fn update_settings(&self, key: &str, value: &Value) -> ClientResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ClientError::Validation("Setting key is required".to_string()));
        }
        let _guard = self.write_lock.lock().await;

        let mut settings: Map<String, Value> = self.load(SETTINGS_KEY)?;
        settings.insert(key.to_string(), value.clone());
        self.save(SETTINGS_KEY, &settings)
    }
}

#[async_trait]
impl CacheMirror for LocalCacheStore {
    async fn mirror_users(&self, fresh: &[UserResponse]) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.users()?;

        for profile in fresh {
            // A local account under the same email but another id is superseded
            users.retain(|u| u.profile.id == profile.id || u.profile.email != profile.email);
            match users.iter_mut().find(|u| u.profile.id == profile.id) {
                Some(existing) => existing.profile = profile.clone(),
                None => users.push(LocalUser {
                    profile: profile.clone(),
                    password_hash: None,
                }),
            }
        }

        self.save(USERS_KEY, &users)
    }

    async fn mirror_courses(&self, courses: &[CourseResponse]) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let cached: Vec<CourseResponse> = self.load(COURSES_KEY)?;
        let merged: Vec<CourseResponse> = courses
            .iter()
            .map(|course| match cached.iter().find(|c| c.id == course.id) {
                Some(known) => keep_answer_keys(course.clone(), known),
                None => course.clone(),
            })
            .collect();
        self.upsert_by_id(COURSES_KEY, &merged, |c| c.id.as_str())
    }

    async fn mirror_products(&self, products: &[ProductResponse]) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        self.upsert_by_id(PRODUCTS_KEY, products, |p| p.id.as_str())
    }

    async fn mirror_password(&self, user_id: &str, password: &str) -> ClientResult<()> {
        let password_hash = hashing::hash_password(password)?;
        let _guard = self.write_lock.lock().await;
        let mut users = self.users()?;

        if let Some(user) = users.iter_mut().find(|u| u.profile.id == user_id) {
            user.password_hash = Some(password_hash);
            self.save(USERS_KEY, &users)?;
        }
        Ok(())
    }

    async fn mirror_grant(&self, user_id: &str, item_type: ItemType, item_id: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        match self.grant(user_id, item_type, item_id) {
            Ok(_) | Err(ClientError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
