use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api", get(controller::dispatch).post(controller::dispatch))
}
