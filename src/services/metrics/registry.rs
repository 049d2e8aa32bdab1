use prometheus::{
    Registry, CounterVec, HistogramVec, HistogramOpts, Opts,
    Encoder, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the platform API
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Dispatcher Metrics
    pub api_actions_total: CounterVec,

    // Business Metrics
    pub entitlements_granted_total: CounterVec,
    pub payments_recorded_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests")
                .namespace("nexlify"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("nexlify")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let api_actions_total = CounterVec::new(
            Opts::new("api_actions_total", "Dispatched API actions by outcome")
                .namespace("nexlify"),
            &["action", "status"],
        )?;
        registry.register(Box::new(api_actions_total.clone()))?;

        let entitlements_granted_total = CounterVec::new(
            Opts::new("entitlements_granted_total", "Course and product entitlements granted")
                .namespace("nexlify"),
            &["kind"],
        )?;
        registry.register(Box::new(entitlements_granted_total.clone()))?;

        let payments_recorded_total = CounterVec::new(
            Opts::new("payments_recorded_total", "Checkout callbacks recorded")
                .namespace("nexlify"),
            &["currency"],
        )?;
        registry.register(Box::new(payments_recorded_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            api_actions_total,
            entitlements_granted_total,
            payments_recorded_total,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
