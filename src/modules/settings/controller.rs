use axum::response::Response;
use serde_json::{Map, Value};

use crate::AppState;
use crate::modules::api::{
    error::ApiResult,
    payload::{ok, parse_valid, success},
};
use crate::modules::settings::{crud::SettingsCrud, model::SiteSetting, schema::UpdateSettingsRequest};

fn settings_map(rows: Vec<SiteSetting>) -> Map<String, Value> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_str(&row.value_json) {
            Ok(value) => Some((row.setting_key, value)),
            Err(e) => {
                tracing::warn!(key = %row.setting_key, error = %e, "skipping unreadable setting");
                None
            }
        })
        .collect()
}

pub async fn get_settings(state: &AppState) -> ApiResult<Response> {
    let rows = SettingsCrud::new(state.db.clone()).list().await?;
    Ok(ok(settings_map(rows)))
}

pub async fn update_settings(state: &AppState, payload: Value) -> ApiResult<Response> {
    let req: UpdateSettingsRequest = parse_valid(payload)?;
    let value_json = serde_json::to_string(&req.value)?;

    SettingsCrud::new(state.db.clone()).upsert(req.key.trim(), &value_json).await?;
    tracing::info!(key = %req.key, "site setting updated");

    Ok(success())
}
