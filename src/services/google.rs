use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Google OAuth userinfo client
/// Verifies an access token by asking the provider who it belongs to
pub struct GoogleAuthClient {
    client: Client,
    userinfo_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    #[error("Token rejected by provider")]
    InvalidToken,
    #[error("Provider did not return a verified email")]
    EmailNotVerified,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleUserInfo {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or("User").to_string())
    }
}

impl GoogleAuthClient {
    pub fn new(client: Client, userinfo_url: impl Into<String>) -> Self {
        Self {
            client,
            userinfo_url: userinfo_url.into(),
        }
    }

    pub async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, GoogleAuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| GoogleAuthError::Http(e.to_string()))?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                return Err(GoogleAuthError::InvalidToken);
            }
            s => return Err(GoogleAuthError::Http(format!("Provider returned status: {}", s))),
        }

        let info: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| GoogleAuthError::Parse(e.to_string()))?;

        // Absent flag is treated as verified; Google omits it for workspace accounts
        if info.email_verified == Some(false) {
            return Err(GoogleAuthError::EmailNotVerified);
        }

        Ok(info)
    }
}
