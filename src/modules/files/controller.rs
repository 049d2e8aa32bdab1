use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::modules::api::{
    error::{ApiError, ApiResult},
    payload::{created, ok, parse, parse_valid, success, IdPayload},
};
use crate::modules::files::{
    crud::FileCrud,
    schema::{FileResponse, UploadFileRequest},
};
use crate::services::data_url;

pub async fn upload_file(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: UploadFileRequest = parse_valid(payload)?;
    let decoded = data_url::decode(&req.data_url)?;

    let crud = FileCrud::new(state.db.clone());
    let id = Uuid::new_v4().to_string();
    crud.create(&id, req.name.trim(), &decoded.mime_type, decoded.bytes.len(), req.data_url.trim())
        .await?;

    tracing::info!(file_id = %id, mime = %decoded.mime_type, size = decoded.bytes.len(), "file uploaded");

    let meta = crud.find_meta(&id).await?.ok_or(ApiError::NotFound("File"))?;
    Ok(created(FileResponse::from(meta)))
}

pub async fn get_file(state: &AppState, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;
    let file = FileCrud::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound("File"))?;

    Ok(ok(FileResponse::from(file)))
}

pub async fn get_files(state: &AppState) -> ApiResult<Response> {
    let files = FileCrud::new(state.db.clone()).list().await?;
    let responses: Vec<FileResponse> = files.into_iter().map(Into::into).collect();
    Ok(ok(responses))
}

pub async fn delete_file(state: &AppState, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;

    if !FileCrud::new(state.db.clone()).delete(&id).await? {
        return Err(ApiError::NotFound("File"));
    }

    Ok(success())
}

/// GET /files/{id}: the shareable link, served as raw bytes.
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let file = FileCrud::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound("File"))?;

    let decoded = data_url::decode(&file.data_url)
        .map_err(|e| ApiError::Internal(format!("stored file {} is unreadable: {}", id, e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, decoded.mime_type),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        decoded.bytes,
    )
        .into_response())
}
