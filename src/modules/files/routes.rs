use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn file_routes() -> Router<Arc<AppState>> {
    Router::new().route("/files/{id}", get(controller::serve_file))
}
