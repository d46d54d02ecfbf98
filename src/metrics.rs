//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Service-to-service calls
    pub static ref DOWNSTREAM_CALLS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("murmur_downstream_calls_total", "Total number of calls to other services"),
        &["service", "outcome"]
    ).expect("metric can be created");
    pub static ref DOWNSTREAM_CALL_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "murmur_downstream_call_duration_seconds",
            "Duration of calls to other services in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["service"]
    ).expect("metric can be created");

    // Engagement edges
    pub static ref TOGGLE_OUTCOMES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("murmur_toggle_outcomes_total", "Outcomes of like/follow toggles"),
        &["edge", "outcome"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("murmur_errors_total", "Total number of errors returned to callers"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Must be called once per process, before the first service starts.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(DOWNSTREAM_CALLS_TOTAL.clone()))
        .expect("DOWNSTREAM_CALLS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(DOWNSTREAM_CALL_DURATION_SECONDS.clone()))
        .expect("DOWNSTREAM_CALL_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(TOGGLE_OUTCOMES_TOTAL.clone()))
        .expect("TOGGLE_OUTCOMES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Record the outcome and latency of one downstream call.
pub fn observe_downstream_call(service: &str, outcome: &str, elapsed: std::time::Duration) {
    DOWNSTREAM_CALLS_TOTAL
        .with_label_values(&[service, outcome])
        .inc();
    DOWNSTREAM_CALL_DURATION_SECONDS
        .with_label_values(&[service])
        .observe(elapsed.as_secs_f64());
}
