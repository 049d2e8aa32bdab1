pub mod classroom;
pub mod client;
pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::{Config, DbPool};
use modules::api::api_routes;
use modules::files::file_routes;
use modules::metrics::metrics_routes;
use services::google::GoogleAuthClient;
use services::jwt::JwtService;
use services::metrics::{metrics_middleware, ApiMetricsCollector, MetricsRegistry};
use services::rate_limit::{create_rate_limiter, RateLimitLayer};
use services::security::security_headers;

/// 2 MiB file as a base64 data URL plus JSON envelope.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub struct AppState {
    pub db: DbPool,
    pub jwt_service: JwtService,
    pub google: GoogleAuthClient,
    pub admin_secret: Option<String>,
    pub api_metrics: ApiMetricsCollector,
}

pub fn create_app(db: DbPool, config: &Config) -> Result<Router, prometheus::Error> {
    let metrics = MetricsRegistry::new()?;
    let http_client = reqwest::Client::new();

    let state = Arc::new(AppState {
        db,
        google: GoogleAuthClient::new(http_client, config.google_userinfo_url.clone()),
        jwt_service: JwtService::new(config.jwt_secret.clone(), config.session_ttl_hours),
        admin_secret: config.admin_secret.clone(),
        api_metrics: ApiMetricsCollector::new(metrics.clone()),
    });

    let rate_limiter = create_rate_limiter(config.rate_limit_per_minute, config.rate_limit_burst);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(api_routes())
        .merge(file_routes())
        .with_state(state)
        .merge(metrics_routes(metrics.clone()))
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(RateLimitLayer::new(rate_limiter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}

async fn root() -> &'static str {
    "Nexlify API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
