use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use validator::Validate;

use super::error::{ApiError, ApiResult};

/// Builds the action payload: the JSON body with query parameters merged in.
/// Body fields win over query parameters of the same name.
pub fn merge_payload(params: &HashMap<String, String>, body: &Bytes) -> ApiResult<Value> {
    let mut payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice::<Value>(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?
    };

    if let Value::Object(map) = &mut payload {
        for (key, value) in params {
            if key != "action" && !map.contains_key(key) {
                map.insert(key.clone(), Value::String(value.clone()));
            }
        }
    }

    Ok(payload)
}

pub fn parse<T: DeserializeOwned>(payload: Value) -> ApiResult<T> {
    serde_json::from_value(payload).map_err(|e| ApiError::BadRequest(format!("Invalid payload: {}", e)))
}

pub fn parse_valid<T: DeserializeOwned + Validate>(payload: Value) -> ApiResult<T> {
    let request: T = parse(payload)?;
    request.validate()?;
    Ok(request)
}

#[derive(Debug, Deserialize)]
pub struct IdPayload {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdPayload {
    pub user_id: String,
}

pub fn ok<T: Serialize>(data: T) -> Response {
    Json(data).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

pub fn success() -> Response {
    Json(json!({ "success": true })).into_response()
}
