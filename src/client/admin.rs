use serde_json::{Map, Value};

use super::error::{ClientError, ClientResult};
use super::storage::SharedStorage;
use crate::modules::activity::schema::SendNotificationRequest;
use crate::modules::courses::schema::{CourseInput, CourseResponse};
use crate::modules::files::schema::{FileResponse, UploadFileRequest};
use crate::modules::inquiries::schema::{InquiryResponse, InquiryStatus};
use crate::modules::products::schema::{ProductInput, ProductResponse};
use crate::modules::settings::schema::{ANNOUNCEMENT_KEY, SEO_KEY, SITE_KEY};
use crate::modules::users::model::UserStatus;
use crate::modules::users::schema::{UpdateUserRequest, UserResponse};

/// Back-office state. Every mutation goes to storage first; the cached lists
/// change only once the call succeeds.
pub struct AdminConsole {
    storage: SharedStorage,
    products: Vec<ProductResponse>,
    courses: Vec<CourseResponse>,
    users: Vec<UserResponse>,
    inquiries: Vec<InquiryResponse>,
    files: Vec<FileResponse>,
    settings: Map<String, Value>,
}

impl AdminConsole {
    pub async fn load(storage: SharedStorage) -> ClientResult<Self> {
        let mut console = Self {
            storage,
            products: Vec::new(),
            courses: Vec::new(),
            users: Vec::new(),
            inquiries: Vec::new(),
            files: Vec::new(),
            settings: Map::new(),
        };
        console.refresh().await?;
        Ok(console)
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let storage = self.storage.clone();
        let (products, courses, users, inquiries, files, settings) = tokio::try_join!(
            storage.get_products(),
            storage.get_courses(),
            storage.get_users(),
            storage.get_inquiries(),
            storage.get_files(),
            storage.get_settings(),
        )?;

        self.products = products;
        self.courses = courses;
        self.users = users;
        self.inquiries = inquiries;
        self.files = files;
        self.settings = settings;
        Ok(())
    }

    pub fn products(&self) -> &[ProductResponse] {
        &self.products
    }

    pub fn courses(&self) -> &[CourseResponse] {
        &self.courses
    }

    pub fn users(&self) -> &[UserResponse] {
        &self.users
    }

    pub fn inquiries(&self) -> &[InquiryResponse] {
        &self.inquiries
    }

    pub fn files(&self) -> &[FileResponse] {
        &self.files
    }

    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    pub fn user(&self, id: &str) -> Option<&UserResponse> {
        self.users.iter().find(|u| u.id == id)
    }

    // Products

    /// Creates when `input.id` is empty, updates otherwise.
    pub async fn save_product(&mut self, input: &ProductInput) -> ClientResult<ProductResponse> {
        match &input.id {
            None => {
                let product = self.storage.create_product(input).await?;
                self.products.insert(0, product.clone());
                Ok(product)
            }
            Some(id) => {
                let product = self.storage.update_product(input).await?;
                upsert(&mut self.products, |p| p.id == *id, product.clone());
                Ok(product)
            }
        }
    }

    pub async fn delete_product(&mut self, id: &str) -> ClientResult<()> {
        self.storage.delete_product(id).await?;
        self.products.retain(|p| p.id != id);
        Ok(())
    }

    // Courses

    pub async fn save_course(&mut self, input: &CourseInput) -> ClientResult<CourseResponse> {
        match &input.id {
            None => {
                let course = self.storage.create_course(input).await?;
                self.courses.insert(0, course.clone());
                Ok(course)
            }
            Some(id) => {
                let course = self.storage.update_course(input).await?;
                upsert(&mut self.courses, |c| c.id == *id, course.clone());
                Ok(course)
            }
        }
    }

    pub async fn delete_course(&mut self, id: &str) -> ClientResult<()> {
        self.storage.delete_course(id).await?;
        self.courses.retain(|c| c.id != id);
        for user in self.users.iter_mut() {
            user.enrolled_courses.retain(|course_id| course_id != id);
        }
        Ok(())
    }

    // Users

    pub async fn set_user_status(&mut self, id: &str, status: UserStatus) -> ClientResult<()> {
        self.storage.update_user_status(id, status).await?;
        if let Some(user) = self.users.iter_mut().find(|u| u.id == id) {
            user.status = status;
        }
        Ok(())
    }

    pub async fn delete_user(&mut self, id: &str) -> ClientResult<()> {
        self.storage.delete_user(id).await?;
        self.users.retain(|u| u.id != id);
        Ok(())
    }

    /// Sends the edited copy of a cached user as a full record update.
    async fn update_cached_user(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut UserResponse) -> ClientResult<()>,
    ) -> ClientResult<UserResponse> {
        let mut user = self
            .user(id)
            .cloned()
            .ok_or_else(|| ClientError::not_found("User"))?;
        edit(&mut user)?;

        let saved = self.storage.update_user(&UpdateUserRequest::from(&user)).await?;
        upsert(&mut self.users, |u| u.id == id, saved.clone());
        Ok(saved)
    }

    pub async fn adjust_balance(&mut self, user_id: &str, delta: f64) -> ClientResult<UserResponse> {
        self.update_cached_user(user_id, |user| {
            let balance = user.balance + delta;
            if balance < 0.0 {
                return Err(ClientError::Validation("Balance cannot be negative".to_string()));
            }
            user.balance = balance;
            Ok(())
        })
        .await
    }

    pub async fn grant_course(&mut self, user_id: &str, course_id: &str) -> ClientResult<UserResponse> {
        self.update_cached_user(user_id, |user| {
            if !user.is_enrolled(course_id) {
                user.enrolled_courses.push(course_id.to_string());
            }
            Ok(())
        })
        .await
    }

    pub async fn revoke_course(&mut self, user_id: &str, course_id: &str) -> ClientResult<UserResponse> {
        self.update_cached_user(user_id, |user| {
            user.enrolled_courses.retain(|id| id != course_id);
            Ok(())
        })
        .await
    }

    pub async fn grant_product(&mut self, user_id: &str, product_id: &str) -> ClientResult<UserResponse> {
        self.update_cached_user(user_id, |user| {
            if !user.owns_product(product_id) {
                user.purchased_products.push(product_id.to_string());
            }
            Ok(())
        })
        .await
    }

    pub async fn revoke_product(&mut self, user_id: &str, product_id: &str) -> ClientResult<UserResponse> {
        self.update_cached_user(user_id, |user| {
            user.purchased_products.retain(|id| id != product_id);
            Ok(())
        })
        .await
    }

    // Inquiries

    pub async fn set_inquiry_status(&mut self, id: &str, status: InquiryStatus) -> ClientResult<()> {
        self.storage.update_inquiry_status(id, status).await?;
        if let Some(inquiry) = self.inquiries.iter_mut().find(|i| i.id == id) {
            inquiry.status = status;
        }
        Ok(())
    }

    pub async fn delete_inquiry(&mut self, id: &str) -> ClientResult<()> {
        self.storage.delete_inquiry(id).await?;
        self.inquiries.retain(|i| i.id != id);
        Ok(())
    }

    // Hosted files

    pub async fn upload_file(&mut self, name: &str, data_url: &str) -> ClientResult<FileResponse> {
        let req = UploadFileRequest {
            name: name.to_string(),
            data_url: data_url.to_string(),
        };
        let file = self.storage.upload_file(&req).await?;
        self.files.insert(0, file.clone());
        Ok(file)
    }

    pub async fn delete_file(&mut self, id: &str) -> ClientResult<()> {
        self.storage.delete_file(id).await?;
        self.files.retain(|f| f.id != id);
        Ok(())
    }

    // Settings, SEO and notifications

    pub async fn update_setting(&mut self, key: &str, value: Value) -> ClientResult<()> {
        self.storage.update_settings(key, &value).await?;
        self.settings.insert(key.to_string(), value);
        Ok(())
    }

    pub async fn save_seo(&mut self, seo: Value) -> ClientResult<()> {
        self.update_setting(SEO_KEY, seo).await
    }

    pub async fn save_site_settings(&mut self, site: Value) -> ClientResult<()> {
        self.update_setting(SITE_KEY, site).await
    }

    pub async fn set_announcement(&mut self, announcement: Value) -> ClientResult<()> {
        self.update_setting(ANNOUNCEMENT_KEY, announcement).await
    }

    /// Without a user id the notification goes to everyone. Returns the recipient count.
    pub async fn send_notification(&self, user_id: Option<&str>, title: &str, message: &str) -> ClientResult<u64> {
        let req = SendNotificationRequest {
            user_id: user_id.map(str::to_string),
            title: title.to_string(),
            message: message.to_string(),
        };
        self.storage.send_notification(&req).await
    }
}

fn upsert<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool, item: T) {
    match items.iter_mut().find(|existing| matches(existing)) {
        Some(slot) => *slot = item,
        None => items.insert(0, item),
    }
}
