use nexlify::services::metrics::{collectors::*, MetricsRegistry};
use serial_test::serial;

// =============================================================================
// INTEGRATION TESTS - METRICS COLLECTORS
// =============================================================================

#[serial]
#[test]
fn test_action_outcomes_are_labelled() {
    let metrics = MetricsRegistry::new().unwrap();
    let collector = ApiMetricsCollector::new(metrics.clone());

    collector.record_action("enroll", 200);
    collector.record_action("enroll", 200);
    collector.record_action("enroll", 404);

    let output = metrics.export().unwrap();
    assert!(output.contains("nexlify_api_actions_total{action=\"enroll\",status=\"200\"} 2"));
    assert!(output.contains("nexlify_api_actions_total{action=\"enroll\",status=\"404\"} 1"));
}

#[serial]
#[test]
fn test_entitlements_by_kind() {
    let metrics = MetricsRegistry::new().unwrap();
    let collector = ApiMetricsCollector::new(metrics.clone());

    collector.record_entitlement("course");
    collector.record_entitlement("product");

    let output = metrics.export().unwrap();
    assert!(output.contains("kind=\"course\""));
    assert!(output.contains("kind=\"product\""));
}

#[serial]
#[test]
fn test_payment_currency_is_normalized() {
    let metrics = MetricsRegistry::new().unwrap();
    let collector = ApiMetricsCollector::new(metrics.clone());

    collector.record_payment("ngn");
    collector.record_payment("NGN");

    let output = metrics.export().unwrap();
    assert!(output.contains("nexlify_payments_recorded_total{currency=\"NGN\"} 2"));
    assert!(!output.contains("currency=\"ngn\""));
}
