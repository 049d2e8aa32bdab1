use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::AppState;
use crate::modules::{activity, auth, courses, enrollments, files, inquiries, products, settings, users};
use crate::modules::users::crud::UserCrud;
use super::action::{Access, Action};
use super::context::RequestContext;
use super::error::{ApiError, ApiResult};
use super::payload::merge_payload;

/// Single entry point for `/api?action=<name>`.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let action = match params.get("action").map(|raw| raw.parse::<Action>()) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            state.api_metrics.record_action("unknown", 400);
            return ApiError::BadRequest(e.to_string()).into_response();
        }
        None => {
            state.api_metrics.record_action("unknown", 400);
            return ApiError::BadRequest("Invalid action".into()).into_response();
        }
    };

    let ctx = RequestContext::from_headers(&headers, &state.jwt_service);

    let response = match run(&state, action, &ctx, &params, &body).await {
        Ok(response) => response,
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(action = %action, error = %e, "action failed");
            } else {
                tracing::debug!(action = %action, error = %e, "action rejected");
            }
            e.into_response()
        }
    };

    state.api_metrics.record_action(action.as_str(), response.status().as_u16());
    response
}

async fn run(
    state: &AppState,
    action: Action,
    ctx: &RequestContext,
    params: &HashMap<String, String>,
    body: &Bytes,
) -> ApiResult<Response> {
    ctx.authorize(action.access())?;
    if action.access() != Access::Public {
        ensure_caller_active(state, ctx).await?;
    }
    let payload: Value = merge_payload(params, body)?;

    match action {
        Action::Register => auth::controller::register(state, payload).await,
        Action::Login => auth::controller::login(state, payload).await,
        Action::GoogleAuth => auth::controller::google_auth(state, payload).await,
        Action::ChangePassword => auth::controller::change_password(state, ctx, payload).await,

        Action::UpdateProfile => users::controller::update_profile(state, ctx, payload).await,
        Action::GetUsers => users::controller::get_users(state).await,
        Action::GetUser => users::controller::get_user(state, ctx, payload).await,
        Action::UpdateUser => users::controller::update_user(state, payload).await,
        Action::UpdateUserStatus => users::controller::update_user_status(state, payload).await,
        Action::DeleteUser => users::controller::delete_user(state, ctx, payload).await,

        Action::GetProducts => products::controller::get_products(state).await,
        Action::GetProduct => products::controller::get_product(state, payload).await,
        Action::CreateProduct => products::controller::create_product(state, payload).await,
        Action::UpdateProduct => products::controller::update_product(state, payload).await,
        Action::DeleteProduct => products::controller::delete_product(state, payload).await,

        Action::GetCourses => courses::controller::get_courses(state, ctx).await,
        Action::GetCourse => courses::controller::get_course(state, ctx, payload).await,
        Action::CreateCourse => courses::controller::create_course(state, payload).await,
        Action::UpdateCourse => courses::controller::update_course(state, payload).await,
        Action::DeleteCourse => courses::controller::delete_course(state, payload).await,

        Action::Enroll => enrollments::controller::enroll(state, ctx, payload).await,
        Action::GetEnrollments => enrollments::controller::get_enrollments(state, ctx, payload).await,
        Action::RecordPayment => enrollments::controller::record_payment(state, ctx, payload).await,

        Action::LogActivity => activity::controller::log_activity(state, ctx, payload).await,
        Action::GetActivity => activity::controller::get_activity(state, ctx, payload).await,
        Action::SendNotification => activity::controller::send_notification(state, payload).await,
        Action::GetNotifications => activity::controller::get_notifications(state, ctx, payload).await,

        Action::SubmitInquiry => inquiries::controller::submit_inquiry(state, payload).await,
        Action::GetInquiries => inquiries::controller::get_inquiries(state).await,
        Action::UpdateInquiryStatus => inquiries::controller::update_inquiry_status(state, payload).await,
        Action::DeleteInquiry => inquiries::controller::delete_inquiry(state, payload).await,

        Action::UploadFile => files::controller::upload_file(state, payload).await,
        Action::GetFile => files::controller::get_file(state, payload).await,
        Action::GetFiles => files::controller::get_files(state).await,
        Action::DeleteFile => files::controller::delete_file(state, payload).await,

        Action::GetSettings => settings::controller::get_settings(state).await,
        Action::UpdateSettings => settings::controller::update_settings(state, payload).await,
    }
}

/// Session tokens outlive status changes and deletes, so gated actions re-read the caller's row.
async fn ensure_caller_active(state: &AppState, ctx: &RequestContext) -> ApiResult<()> {
    let claims = ctx.require_session()?;
    let user = UserCrud::new(state.db.clone())
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".into()))?;

    let status = user.status();
    if !status.can_sign_in() {
        return Err(ApiError::AccountStatus(status));
    }
    Ok(())
}
