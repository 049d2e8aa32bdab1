use super::error::ClientResult;
use super::session::{Session, SessionContext};
use super::storage::{SharedStorage, Storage};
use crate::modules::activity::schema::{ActivityLogResponse, ActivityType, LogActivityRequest};
use crate::modules::auth::schema::{AuthResponse, ChangePasswordRequest, RegisterRequest};
use crate::modules::users::schema::{UpdateProfileRequest, UserResponse};

/// App-facing entry point: a `Storage` plus the signed-in session.
pub struct DataClient {
    storage: SharedStorage,
    session: SessionContext,
}

impl DataClient {
    pub fn new(storage: SharedStorage, session: SessionContext) -> Self {
        storage.set_session_token(session.token().as_deref());
        Self { storage, session }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn current_user(&self) -> Option<UserResponse> {
        self.session.current_user()
    }

    fn begin(&self, auth: AuthResponse) -> ClientResult<UserResponse> {
        let session = Session::from(auth);
        let user = session.user.clone();
        self.storage.set_session_token(Some(&session.token));
        self.session.start(session)?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<UserResponse> {
        let auth = self.storage.register(req).await?;
        self.begin(auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserResponse> {
        let auth = self.storage.login(email, password).await?;
        self.begin(auth)
    }

    pub async fn google_auth(&self, access_token: &str) -> ClientResult<UserResponse> {
        let auth = self.storage.google_auth(access_token).await?;
        self.begin(auth)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.storage.set_session_token(None);
        self.session.end()
    }

    /// Re-reads the signed-in user from storage.
    pub async fn refresh_user(&self) -> ClientResult<UserResponse> {
        let current = self.session.require_user()?;
        let user = self.storage.get_user(&current.id).await?;
        self.session.replace_user(&user)?;
        Ok(user)
    }

    /// Enrolls the signed-in user; the session reflects it immediately.
    pub async fn enroll(&self, course_id: &str) -> ClientResult<UserResponse> {
        let user = self.session.require_user()?;
        self.storage.enroll(&user.id, course_id).await?;
        Ok(self.session.record_enrollment(course_id)?.unwrap_or(user))
    }

    pub async fn update_profile(&self, name: Option<String>, avatar: Option<String>) -> ClientResult<UserResponse> {
        let user = self.session.require_user()?;
        let req = UpdateProfileRequest {
            user_id: user.id,
            name,
            avatar,
        };
        let updated = self.storage.update_profile(&req).await?;
        self.session.replace_user(&updated)?;
        Ok(updated)
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> ClientResult<()> {
        let user = self.session.require_user()?;
        let req = ChangePasswordRequest {
            user_id: user.id,
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.storage.change_password(&req).await
    }

    pub async fn log_activity(&self, action: &str, description: &str, log_type: ActivityType) -> ClientResult<()> {
        let user = self.session.require_user()?;
        let req = LogActivityRequest {
            user_id: user.id,
            action: action.to_string(),
            description: description.to_string(),
            log_type,
        };
        self.storage.log_activity(&req).await
    }

    pub async fn activity(&self) -> ClientResult<Vec<ActivityLogResponse>> {
        let user = self.session.require_user()?;
        self.storage.get_activity(&user.id).await
    }

    pub async fn notifications(&self) -> ClientResult<Vec<ActivityLogResponse>> {
        let user = self.session.require_user()?;
        self.storage.get_notifications(&user.id).await
    }
}
