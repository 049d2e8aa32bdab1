use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use super::MetricsRegistry;

/// Records request count and latency per method and normalized path.
pub async fn metrics_middleware(
    State(metrics): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let endpoint = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics
        .http_requests_total
        .with_label_values(&[&method, &endpoint, &status])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&[&method, &endpoint])
        .observe(started.elapsed().as_secs_f64());

    response
}

/// Collapses id segments so hosted-file previews share one label: /files/123 -> /files/:id
fn normalize_path(path: &str) -> String {
    let normalized: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| if is_id_like(segment) { ":id" } else { segment })
        .collect();

    format!("/{}", normalized.join("/"))
}

fn is_id_like(segment: &str) -> bool {
    let is_uuid = segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4;
    is_uuid || segment.chars().all(|c| c.is_ascii_digit())
}
