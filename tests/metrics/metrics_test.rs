use nexlify::services::metrics::MetricsRegistry;
use serial_test::serial;

// =============================================================================
// INTEGRATION TESTS - METRICS REGISTRY
// =============================================================================

#[serial]
#[test]
fn test_metrics_registry_initialization() {
    let metrics = MetricsRegistry::new();
    assert!(metrics.is_ok(), "Failed to initialize metrics registry");
}

#[serial]
#[test]
fn test_registries_are_independent() {
    let first = MetricsRegistry::new().unwrap();
    let second = MetricsRegistry::new().unwrap();

    first
        .api_actions_total
        .with_label_values(&["login", "200"])
        .inc();

    assert!(first.export().unwrap().contains("action=\"login\""));
    assert!(!second.export().unwrap().contains("action=\"login\""));
}

#[serial]
#[test]
fn test_http_metrics_recording() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .http_requests_total
        .with_label_values(&["POST", "/api", "200"])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&["POST", "/api"])
        .observe(0.042);

    let output = metrics.export().unwrap();
    assert!(output.contains("nexlify_http_requests_total"));
    assert!(output.contains("nexlify_http_request_duration_seconds"));
    assert!(output.contains("method=\"POST\""));
    assert!(output.contains("endpoint=\"/api\""));
}

#[serial]
#[test]
fn test_business_metrics_recording() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .entitlements_granted_total
        .with_label_values(&["product"])
        .inc();
    metrics
        .payments_recorded_total
        .with_label_values(&["USD"])
        .inc_by(2.0);

    let output = metrics.export().unwrap();
    assert!(output.contains("nexlify_entitlements_granted_total{kind=\"product\"} 1"));
    assert!(output.contains("nexlify_payments_recorded_total{currency=\"USD\"} 2"));
}

#[serial]
#[test]
fn test_metrics_export_format() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .api_actions_total
        .with_label_values(&["getCourses", "200"])
        .inc();

    let output = metrics.export().unwrap();
    assert!(output.contains("# HELP nexlify_api_actions_total"));
    assert!(output.contains("# TYPE nexlify_api_actions_total counter"));
}
