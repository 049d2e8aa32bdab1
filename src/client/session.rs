use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use super::error::{ClientError, ClientResult};
use super::local_storage::{read_json, write_json, LocalStorage};
use crate::modules::auth::schema::AuthResponse;
use crate::modules::users::model::Role;
use crate::modules::users::schema::UserResponse;

pub const SESSION_KEY: &str = "nexlify_session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserResponse,
    pub token: String,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            user: auth.user,
            token: auth.token,
        }
    }
}

/// Where the signed-in session survives restarts.
pub trait SessionPort: Send + Sync {
    fn load(&self) -> ClientResult<Option<Session>>;
    fn save(&self, session: &Session) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// Keeps the session under one key of a `LocalStorage`.
pub struct LocalSessionPort {
    storage: Arc<dyn LocalStorage>,
}

impl LocalSessionPort {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }
}

impl SessionPort for LocalSessionPort {
    fn load(&self) -> ClientResult<Option<Session>> {
        read_json(self.storage.as_ref(), SESSION_KEY)
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        write_json(self.storage.as_ref(), SESSION_KEY, session)
    }

    fn clear(&self) -> ClientResult<()> {
        self.storage.remove_item(SESSION_KEY)
    }
}

/// The signed-in user, kept in memory and mirrored to the port on every change.
pub struct SessionContext {
    port: Arc<dyn SessionPort>,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// Restores whatever session the port holds. An unreadable session is discarded.
    pub fn restore(port: Arc<dyn SessionPort>) -> Self {
        let current = match port.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                let _ = port.clear();
                None
            }
        };

        Self {
            port,
            current: RwLock::new(current),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    pub fn current_user(&self) -> Option<UserResponse> {
        self.current().map(|session| session.user)
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.role == Role::Admin)
    }

    pub fn require_user(&self) -> ClientResult<UserResponse> {
        self.current_user().ok_or_else(ClientError::sign_in_required)
    }

    pub fn start(&self, session: Session) -> ClientResult<()> {
        self.port.save(&session)?;
        *self.write()? = Some(session);
        Ok(())
    }

    pub fn end(&self) -> ClientResult<()> {
        self.port.clear()?;
        *self.write()? = None;
        Ok(())
    }

    /// Applies `patch` to the cached user ahead of any server refresh.
    pub fn patch_user(&self, patch: impl FnOnce(&mut UserResponse)) -> ClientResult<Option<UserResponse>> {
        let mut guard = self.write()?;
        let Some(session) = guard.as_mut() else {
            return Ok(None);
        };
        patch(&mut session.user);
        self.port.save(session)?;
        Ok(Some(session.user.clone()))
    }

    /// Replaces the cached user when it is the signed-in one.
    pub fn replace_user(&self, user: &UserResponse) -> ClientResult<()> {
        let is_current = self.current_user().is_some_and(|current| current.id == user.id);
        if is_current {
            self.patch_user(|cached| *cached = user.clone())?;
        }
        Ok(())
    }

    pub fn record_enrollment(&self, course_id: &str) -> ClientResult<Option<UserResponse>> {
        self.patch_user(|user| {
            if !user.is_enrolled(course_id) {
                user.enrolled_courses.push(course_id.to_string());
            }
        })
    }

    pub fn record_purchase(&self, product_id: &str) -> ClientResult<Option<UserResponse>> {
        self.patch_user(|user| {
            if !user.owns_product(product_id) {
                user.purchased_products.push(product_id.to_string());
            }
        })
    }

    fn write(&self) -> ClientResult<std::sync::RwLockWriteGuard<'_, Option<Session>>> {
        self.current
            .write()
            .map_err(|_| ClientError::Local("session lock poisoned".to_string()))
    }
}
