use axum::response::Response;
use serde_json::Value;

use crate::AppState;
use crate::modules::activity::{crud::ActivityCrud, schema::ActivityType};
use crate::modules::api::{
    context::RequestContext,
    error::{ApiError, ApiResult},
    payload::{ok, parse, parse_valid, success, IdPayload},
};
use crate::modules::courses::crud::CourseCrud;
use crate::modules::enrollments::crud::EnrollmentCrud;
use crate::modules::users::{
    crud::UserCrud,
    model::User,
    schema::{UpdateProfileRequest, UpdateUserRequest, UpdateUserStatusRequest, UserResponse},
};

/// Attaches the user's enrolled course ids from the enrollments table.
pub async fn user_response(state: &AppState, user: User) -> ApiResult<UserResponse> {
    let enrolled = EnrollmentCrud::new(state.db.clone())
        .course_ids_for_user(&user.id)
        .await?;
    Ok(UserResponse::from_model(user, enrolled))
}

pub async fn get_users(state: &AppState) -> ApiResult<Response> {
    let users = UserCrud::new(state.db.clone()).list().await?;
    let mut enrollments = EnrollmentCrud::new(state.db.clone()).course_ids_by_user().await?;

    let responses: Vec<UserResponse> = users
        .into_iter()
        .map(|user| {
            let enrolled = enrollments.remove(&user.id).unwrap_or_default();
            UserResponse::from_model(user, enrolled)
        })
        .collect();

    Ok(ok(responses))
}

pub async fn get_user(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;
    ctx.require_self_or_admin(&id)?;

    let user = UserCrud::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(ok(user_response(state, user).await?))
}

pub async fn update_user(state: &AppState, payload: Value) -> ApiResult<Response> {
    let mut req: UpdateUserRequest = parse_valid(payload)?;
    req.email = req.email.trim().to_lowercase();
    dedup_in_place(&mut req.enrolled_courses);
    dedup_in_place(&mut req.purchased_products);

    let crud = UserCrud::new(state.db.clone());
    let existing = crud.find_by_id(&req.id).await?.ok_or(ApiError::NotFound("User"))?;

    if existing.email != req.email {
        if let Some(other) = crud.find_by_email(&req.email).await? {
            if other.id != req.id {
                return Err(ApiError::Conflict("Email already exists".into()));
            }
        }
    }

    let known = CourseCrud::new(state.db.clone())
        .existing_ids(&req.enrolled_courses)
        .await?;
    if let Some(unknown) = req.enrolled_courses.iter().find(|id| !known.contains(id)) {
        tracing::debug!(user_id = %req.id, course_id = %unknown, "grant of unknown course rejected");
        return Err(ApiError::NotFound("Course"));
    }

    crud.update(&req).await?;
    EnrollmentCrud::new(state.db.clone())
        .replace_for_user(&req.id, &req.enrolled_courses)
        .await?;

    tracing::info!(user_id = %req.id, "user record updated by admin");

    let user = crud.find_by_id(&req.id).await?.ok_or(ApiError::NotFound("User"))?;
    Ok(ok(user_response(state, user).await?))
}

pub async fn update_user_status(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: UpdateUserStatusRequest = parse(payload)?;
    let crud = UserCrud::new(state.db.clone());

    crud.find_by_id(&req.id).await?.ok_or(ApiError::NotFound("User"))?;
    crud.set_status(&req.id, req.status).await?;

    let activity = ActivityCrud::new(state.db.clone());
    let description = format!("Account status set to {}", req.status.as_str());
    if let Err(e) = activity.append(&req.id, "Status changed", &description, ActivityType::Admin).await {
        tracing::warn!(user_id = %req.id, error = %e, "failed to record activity");
    }

    tracing::info!(user_id = %req.id, status = req.status.as_str(), "user status changed");
    Ok(success())
}

pub async fn delete_user(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;

    if ctx.claims().is_some_and(|claims| claims.sub == id) {
        return Err(ApiError::BadRequest("Admins cannot delete their own account".into()));
    }

    if !UserCrud::new(state.db.clone()).delete(&id).await? {
        return Err(ApiError::NotFound("User"));
    }

    tracing::info!(user_id = %id, "user deleted");
    Ok(success())
}

pub async fn update_profile(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let req: UpdateProfileRequest = parse_valid(payload)?;
    ctx.require_self_or_admin(&req.user_id)?;

    let crud = UserCrud::new(state.db.clone());
    crud.find_by_id(&req.user_id).await?.ok_or(ApiError::NotFound("User"))?;

    let name = req.name.as_deref().map(str::trim);
    crud.update_profile(&req.user_id, name, req.avatar.as_deref()).await?;

    let user = crud.find_by_id(&req.user_id).await?.ok_or(ApiError::NotFound("User"))?;
    Ok(ok(user_response(state, user).await?))
}

fn dedup_in_place(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}
