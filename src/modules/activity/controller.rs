use axum::response::Response;
use serde_json::Value;

use crate::AppState;
use crate::modules::activity::{
    crud::ActivityCrud,
    schema::{ActivityLogResponse, ActivityType, LogActivityRequest, SendNotificationRequest},
};
use crate::modules::api::{
    context::RequestContext,
    error::{ApiError, ApiResult},
    payload::{ok, parse, parse_valid, success, UserIdPayload},
};
use crate::modules::users::crud::UserCrud;

pub async fn log_activity(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let req: LogActivityRequest = parse_valid(payload)?;
    ctx.require_self_or_admin(&req.user_id)?;

    // Notifications are only written through sendNotification
    if req.log_type == ActivityType::Notification {
        ctx.require_admin()?;
    }

    ActivityCrud::new(state.db.clone())
        .append(&req.user_id, &req.action, &req.description, req.log_type)
        .await?;

    Ok(success())
}

pub async fn get_activity(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    read_feed(state, ctx, payload, false).await
}

pub async fn get_notifications(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    read_feed(state, ctx, payload, true).await
}

async fn read_feed(
    state: &AppState,
    ctx: &RequestContext,
    payload: Value,
    notifications: bool,
) -> ApiResult<Response> {
    let UserIdPayload { user_id } = parse(payload)?;
    ctx.require_self_or_admin(&user_id)?;

    let logs = ActivityCrud::new(state.db.clone())
        .recent_for_user(&user_id, notifications)
        .await?;

    let responses: Vec<ActivityLogResponse> = logs.into_iter().map(Into::into).collect();
    Ok(ok(responses))
}

pub async fn send_notification(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: SendNotificationRequest = parse_valid(payload)?;
    let activity = ActivityCrud::new(state.db.clone());

    let delivered = match &req.user_id {
        Some(user_id) => {
            UserCrud::new(state.db.clone())
                .find_by_id(user_id)
                .await?
                .ok_or(ApiError::NotFound("User"))?;
            activity
                .append(user_id, &req.title, &req.message, ActivityType::Notification)
                .await?;
            1
        }
        None => {
            activity
                .append_for_all_users(&req.title, &req.message, ActivityType::Notification)
                .await?
        }
    };

    tracing::info!(recipients = delivered, "notification sent");
    Ok(ok(serde_json::json!({ "success": true, "delivered": delivered })))
}
