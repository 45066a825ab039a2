//! Metrics collection and exposition.
//!
//! # Metrics
//! - `compiler_requests_total` (counter): requests by status and outcome
//! - `compiler_request_duration_seconds` (histogram): latency distribution

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "compiler_requests_total";
pub const REQUEST_DURATION: &str = "compiler_request_duration_seconds";

/// Start the Prometheus exporter on `addr`. Failures are logged, the
/// service keeps running without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics exporter"),
    }
}

pub fn record_request(status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(REQUESTS_TOTAL, "status" => status.to_string(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!(REQUEST_DURATION, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
