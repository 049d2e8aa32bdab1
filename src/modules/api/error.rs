use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::modules::users::model::UserStatus;
use crate::services::{data_url::DataUrlError, google::GoogleAuthError};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("Account {}", .0.as_str())]
    AccountStatus(UserStatus),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::AccountStatus(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            Self::AccountStatus(account_status) => json!({
                "error": self.to_string(),
                "status": account_status.as_str(),
            }),
            Self::Database(e) if is_unique_violation(e) => json!({ "error": "Record already exists" }),
            // Never leak driver or internal messages to the caller
            Self::Database(e) => {
                tracing::error!(error = %e, "database error while handling request");
                json!({ "error": "Internal server error" })
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while handling request");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Internal(format!("password hashing: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("session token: {}", err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("stored json: {}", err))
    }
}

impl From<DataUrlError> for ApiError {
    fn from(err: DataUrlError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<GoogleAuthError> for ApiError {
    fn from(err: GoogleAuthError) -> Self {
        match err {
            GoogleAuthError::InvalidToken | GoogleAuthError::EmailNotVerified => {
                Self::Unauthorized(err.to_string())
            }
            GoogleAuthError::Http(_) | GoogleAuthError::Parse(_) => {
                Self::Internal(format!("google userinfo: {}", err))
            }
        }
    }
}
