//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (request latency, prediction outcomes, artifact info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_gauge, GaugeVec, Histogram, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    request_latency_seconds: Histogram,
    predictions_no_failure: IntGauge,
    predictions_failure: IntGauge,
    request_errors: IntGauge,
    artifact_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            request_latency_seconds: register_histogram!(
                "predict_server_request_latency_seconds",
                "Time spent serving a prediction request end to end",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register request_latency_seconds"),

            predictions_no_failure: register_int_gauge!(
                "predict_server_predictions_no_failure_total",
                "Total number of predictions that reported no failure"
            )
            .expect("Failed to register predictions_no_failure"),

            predictions_failure: register_int_gauge!(
                "predict_server_predictions_failure_total",
                "Total number of predictions that reported a failure"
            )
            .expect("Failed to register predictions_failure"),

            request_errors: register_int_gauge!(
                "predict_server_request_errors_total",
                "Total number of prediction requests rejected with an error"
            )
            .expect("Failed to register request_errors"),

            artifact_info: register_gauge_vec!(
                "predict_server_artifact_info",
                "Information about the loaded model artifacts",
                &["artifact", "checksum"]
            )
            .expect("Failed to register artifact_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        // Initialize global metrics on first call
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a request latency observation
    pub fn observe_request_latency(&self, duration_secs: f64) {
        self.inner().request_latency_seconds.observe(duration_secs);
    }

    /// Increment the no-failure prediction counter
    pub fn inc_no_failure(&self) {
        self.inner().predictions_no_failure.inc();
    }

    /// Increment the failure-detected prediction counter
    pub fn inc_failure_detected(&self) {
        self.inner().predictions_failure.inc();
    }

    /// Increment the rejected request counter
    pub fn inc_request_errors(&self) {
        self.inner().request_errors.inc();
    }

    /// Publish one loaded artifact's provenance
    pub fn set_artifact_info(&self, artifact: &str, checksum: &str) {
        self.inner()
            .artifact_info
            .with_label_values(&[artifact, checksum])
            .set(1.0);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for predictions,
/// rejected requests, and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log a served prediction
    pub fn log_prediction(&self, outcome: &str, failure_type: Option<&str>, elapsed_us: u64) {
        info!(
            event = "prediction_served",
            service = %self.service,
            outcome = %outcome,
            failure_type = ?failure_type,
            elapsed_us = elapsed_us,
            "Prediction served"
        );
    }

    /// Log a rejected prediction request
    pub fn log_request_error(&self, message: &str) {
        warn!(
            event = "request_rejected",
            service = %self.service,
            error = %message,
            "Prediction request rejected"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, transform_version: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            service_version = %version,
            transform_version = %transform_version,
            "Prediction service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Prediction service shutting down"
        );
    }
}
