use std::sync::Arc;

use super::MetricsRegistry;

/// Collector for dispatcher and entitlement metrics
#[derive(Clone)]
pub struct ApiMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl ApiMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn record_action(&self, action: &str, status: u16) {
        self.metrics
            .api_actions_total
            .with_label_values(&[action, &status.to_string()])
            .inc();
    }

    pub fn record_entitlement(&self, kind: &str) {
        self.metrics
            .entitlements_granted_total
            .with_label_values(&[kind])
            .inc();
    }

    pub fn record_payment(&self, currency: &str) {
        self.metrics
            .payments_recorded_total
            .with_label_values(&[&currency.to_ascii_uppercase()])
            .inc();
    }
}
