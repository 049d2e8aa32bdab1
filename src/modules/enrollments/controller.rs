use axum::response::Response;
use serde_json::Value;

use crate::AppState;
use crate::modules::activity::{crud::ActivityCrud, schema::ActivityType};
use crate::modules::api::{
    context::RequestContext,
    error::{ApiError, ApiResult},
    payload::{ok, parse, parse_valid, success, UserIdPayload},
};
use crate::modules::courses::crud::CourseCrud;
use crate::modules::enrollments::{
    crud::EnrollmentCrud,
    schema::{EnrollRequest, ItemType, RecordPaymentRequest},
};
use crate::modules::products::crud::ProductCrud;
use crate::modules::users::crud::UserCrud;

pub async fn enroll(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let req: EnrollRequest = parse(payload)?;
    ctx.require_self_or_admin(&req.user_id)?;

    let course = CourseCrud::new(state.db.clone())
        .find_by_id(&req.course_id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    UserCrud::new(state.db.clone())
        .find_by_id(&req.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let inserted = EnrollmentCrud::new(state.db.clone())
        .enroll(&req.user_id, &req.course_id)
        .await?;

    if inserted {
        state.api_metrics.record_entitlement(ItemType::Course.as_str());
        let description = format!("Enrolled in \"{}\"", course.title);
        if let Err(e) = ActivityCrud::new(state.db.clone())
            .append(&req.user_id, "Course enrollment", &description, ActivityType::Enrollment)
            .await
        {
            tracing::warn!(user_id = %req.user_id, error = %e, "failed to record activity");
        }
        tracing::info!(user_id = %req.user_id, course_id = %req.course_id, "user enrolled");
    }

    Ok(success())
}

pub async fn get_enrollments(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let UserIdPayload { user_id } = parse(payload)?;
    ctx.require_self_or_admin(&user_id)?;

    let course_ids = EnrollmentCrud::new(state.db.clone())
        .course_ids_for_user(&user_id)
        .await?;

    Ok(ok(course_ids))
}

/// Grants the bought item and writes a purchase log entry.
pub async fn record_payment(state: &AppState, ctx: &RequestContext, payload: Value) -> ApiResult<Response> {
    let req: RecordPaymentRequest = parse_valid(payload)?;
    ctx.require_self_or_admin(&req.user_id)?;

    let users = UserCrud::new(state.db.clone());
    users.find_by_id(&req.user_id).await?.ok_or(ApiError::NotFound("User"))?;

    let title = match req.item_type {
        ItemType::Course => {
            let course = CourseCrud::new(state.db.clone())
                .find_by_id(&req.item_id)
                .await?
                .ok_or(ApiError::NotFound("Course"))?;
            EnrollmentCrud::new(state.db.clone())
                .enroll(&req.user_id, &req.item_id)
                .await?;
            course.title
        }
        ItemType::Product => {
            let product = ProductCrud::new(state.db.clone())
                .find_by_id(&req.item_id)
                .await?
                .ok_or(ApiError::NotFound("Product"))?;
            users.add_purchased_product(&req.user_id, &req.item_id).await?;
            product.title
        }
    };

    tracing::warn!(
        user_id = %req.user_id,
        item_id = %req.item_id,
        reference = %req.reference,
        "recording payment from client callback without gateway verification"
    );

    ActivityCrud::new(state.db.clone())
        .append(&req.user_id, "Payment", &req.activity_description(&title), ActivityType::Purchase)
        .await?;

    state.api_metrics.record_entitlement(req.item_type.as_str());
    state.api_metrics.record_payment(&req.currency.to_ascii_uppercase());

    Ok(success())
}
