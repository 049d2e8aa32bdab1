use crate::modules::users::model::UserStatus;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Network failure or a 5xx from the API. The only error that triggers fallback.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account {}", .0.as_str())]
    AccountStatus(UserStatus),

    #[error("{0}")]
    Validation(String),

    #[error("Local storage error: {0}")]
    Local(String),
}

impl ClientError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ClientError::Unavailable(_))
    }

    pub fn not_found(what: &str) -> Self {
        ClientError::NotFound(format!("{} not found", what))
    }

    pub fn sign_in_required() -> Self {
        ClientError::Api {
            status: 401,
            message: "Authentication required".to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Local(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Local(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for ClientError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ClientError::Local(format!("Password hashing failed: {}", err))
    }
}
