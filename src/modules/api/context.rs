use axum::http::{header, HeaderMap};

use super::action::Access;
use super::error::{ApiError, ApiResult};
use crate::modules::users::model::Role;
use crate::services::jwt::{Claims, JwtService};

/// Caller identity resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub enum RequestContext {
    Anonymous,
    InvalidToken,
    Authenticated(Claims),
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap, jwt: &JwtService) -> Self {
        let Some(raw) = headers.get(header::AUTHORIZATION) else {
            return Self::Anonymous;
        };

        let token = raw
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        match token.map(|t| jwt.verify_session_token(t)) {
            Some(Ok(data)) => Self::Authenticated(data.claims),
            _ => Self::InvalidToken,
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Authenticated(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn require_session(&self) -> ApiResult<&Claims> {
        match self {
            Self::Authenticated(claims) => Ok(claims),
            Self::Anonymous => Err(ApiError::Unauthorized("Authentication required".into())),
            Self::InvalidToken => Err(ApiError::Unauthorized("Invalid or expired session".into())),
        }
    }

    pub fn require_admin(&self) -> ApiResult<&Claims> {
        let claims = self.require_session()?;
        if claims.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin access required".into()));
        }
        Ok(claims)
    }

    pub fn require_self_or_admin(&self, user_id: &str) -> ApiResult<&Claims> {
        let claims = self.require_session()?;
        if claims.role != Role::Admin && claims.sub != user_id {
            return Err(ApiError::Forbidden("Not allowed to act for this user".into()));
        }
        Ok(claims)
    }

    /// Gate applied by the dispatcher before a handler runs.
    /// `SelfOrAdmin` only needs a session here; the handler checks the target user.
    pub fn authorize(&self, access: Access) -> ApiResult<()> {
        match access {
            Access::Public => Ok(()),
            Access::SelfOrAdmin => self.require_session().map(|_| ()),
            Access::Admin => self.require_admin().map(|_| ()),
        }
    }
}
