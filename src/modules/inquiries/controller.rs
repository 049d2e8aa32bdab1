use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

use crate::AppState;
use crate::modules::api::{
    error::{ApiError, ApiResult},
    payload::{created, ok, parse, parse_valid, success, IdPayload},
};
use crate::modules::inquiries::{
    crud::InquiryCrud,
    schema::{InquiryResponse, SubmitInquiryRequest, UpdateInquiryStatusRequest},
};

pub async fn submit_inquiry(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: SubmitInquiryRequest = parse_valid(payload)?;
    let crud = InquiryCrud::new(state.db.clone());
    let id = Uuid::new_v4().to_string();

    crud.create(&id, &req).await?;
    tracing::info!(inquiry_id = %id, service = %req.service_type, "inquiry submitted");

    let inquiry = crud.find_by_id(&id).await?.ok_or(ApiError::NotFound("Inquiry"))?;
    Ok(created(InquiryResponse::from(inquiry)))
}

pub async fn get_inquiries(state: &AppState) -> ApiResult<Response> {
    let inquiries = InquiryCrud::new(state.db.clone()).list().await?;
    let responses: Vec<InquiryResponse> = inquiries.into_iter().map(Into::into).collect();
    Ok(ok(responses))
}

pub async fn update_inquiry_status(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: UpdateInquiryStatusRequest = parse(payload)?;
    let crud = InquiryCrud::new(state.db.clone());

    crud.find_by_id(&req.id).await?.ok_or(ApiError::NotFound("Inquiry"))?;
    crud.set_status(&req.id, req.status).await?;

    Ok(success())
}

pub async fn delete_inquiry(state: &AppState, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;

    if !InquiryCrud::new(state.db.clone()).delete(&id).await? {
        return Err(ApiError::NotFound("Inquiry"));
    }

    Ok(success())
}
