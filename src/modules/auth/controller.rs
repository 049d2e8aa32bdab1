use axum::response::Response;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::AppState;
use crate::modules::activity::{crud::ActivityCrud, schema::ActivityType};
use crate::modules::api::{
    context::RequestContext,
    error::{ApiError, ApiResult},
    payload::{created, ok, parse, parse_valid, success},
};
use crate::modules::auth::schema::{
    resolve_role, AuthResponse, ChangePasswordRequest, GoogleAuthRequest, LoginRequest, RegisterRequest,
};
use crate::modules::users::{
    controller::user_response,
    crud::UserCrud,
    model::{AuthProvider, Role, User, UserStatus},
};
use crate::services::hashing;

pub async fn register(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: RegisterRequest = parse_valid(payload)?;
    let email = normalize_email(&req.email);
    let crud = UserCrud::new(state.db.clone());

    if crud.email_exists(&email).await? {
        return Err(ApiError::Conflict("Email already exists".into()));
    }

    let role = resolve_role(req.role, req.admin_secret.as_deref(), state.admin_secret.as_deref());
    if req.role == Some(Role::Admin) && role != Role::Admin {
        tracing::warn!(email = %email, "admin registration without valid secret, downgraded to user");
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email,
        password_hash: hashing::hash_password(&req.password)?,
        role: role.as_str().to_string(),
        status: UserStatus::Active.as_str().to_string(),
        balance: 0.0,
        avatar: None,
        purchased_products: "[]".to_string(),
        auth_provider: AuthProvider::Password.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = crud.create(&user).await {
        // Lost a race with a concurrent registration of the same email
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            return Err(ApiError::Conflict("Email already exists".into()));
        }
        return Err(e.into());
    }

    tracing::info!(user_id = %user.id, role = role.as_str(), "user registered");
    record_auth_activity(state, &user.id, "Registered", "Account created").await;

    let response = session_for(state, user).await?;
    Ok(created(response))
}

pub async fn login(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: LoginRequest = parse(payload)?;
    let crud = UserCrud::new(state.db.clone());

    let user = crud
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let is_valid = hashing::verify_password(&req.password, &user.password_hash).unwrap_or_else(|e| {
        tracing::warn!(user_id = %user.id, error = %e, "stored password hash is unreadable");
        false
    });
    if !is_valid {
        return Err(ApiError::InvalidCredentials);
    }

    ensure_can_sign_in(&user)?;
    record_auth_activity(state, &user.id, "Logged in", "Signed in with email and password").await;

    let response = session_for(state, user).await?;
    Ok(ok(response))
}

pub async fn google_auth(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: GoogleAuthRequest = parse(payload)?;
    let info = state.google.fetch_user_info(&req.access_token).await?;
    let email = normalize_email(&info.email);
    let crud = UserCrud::new(state.db.clone());

    let user = match crud.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4().to_string(),
                name: info.display_name(),
                email,
                // Never used for login; Google accounts authenticate through the provider
                password_hash: hashing::hash_password(&Uuid::new_v4().to_string())?,
                role: Role::User.as_str().to_string(),
                status: UserStatus::Active.as_str().to_string(),
                balance: 0.0,
                avatar: info.picture.clone(),
                purchased_products: "[]".to_string(),
                auth_provider: AuthProvider::Google.as_str().to_string(),
                created_at: now,
                updated_at: now,
            };
            crud.create(&user).await?;
            tracing::info!(user_id = %user.id, "provisioned user from Google sign-in");
            user
        }
    };

    ensure_can_sign_in(&user)?;
    record_auth_activity(state, &user.id, "Logged in", "Signed in with Google").await;

    let response = session_for(state, user).await?;
    Ok(ok(response))
}

pub async fn change_password(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let req: ChangePasswordRequest = parse_valid(payload)?;
    ctx.require_self_or_admin(&req.user_id)?;

    let crud = UserCrud::new(state.db.clone());
    let user = crud.find_by_id(&req.user_id).await?.ok_or(ApiError::NotFound("User"))?;

    let is_valid = hashing::verify_password(&req.current_password, &user.password_hash).unwrap_or(false);
    if !is_valid {
        return Err(ApiError::InvalidCredentials);
    }

    crud.update_password(&user.id, &hashing::hash_password(&req.new_password)?).await?;
    record_auth_activity(state, &user.id, "Password changed", "Account password updated").await;

    Ok(success())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn ensure_can_sign_in(user: &User) -> ApiResult<()> {
    let status = user.status();
    if !status.can_sign_in() {
        tracing::info!(user_id = %user.id, status = status.as_str(), "sign-in refused");
        return Err(ApiError::AccountStatus(status));
    }
    Ok(())
}

async fn session_for(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let token = state
        .jwt_service
        .create_session_token(&user.id, &user.email, user.role())?;
    let user = user_response(state, user).await?;

    Ok(AuthResponse {
        user,
        token,
        expires_in: state.jwt_service.session_duration_secs(),
    })
}

// Audit entries are best effort; a failed insert never fails the sign-in
async fn record_auth_activity(state: &AppState, user_id: &str, action: &str, description: &str) {
    let crud = ActivityCrud::new(state.db.clone());
    if let Err(e) = crud.append(user_id, action, description, ActivityType::Auth).await {
        tracing::warn!(user_id = %user_id, error = %e, "failed to record activity");
    }
}
