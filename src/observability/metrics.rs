//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): requests entering the pipeline
//! - `gate_rejections_total` (counter): terminal rejections by reason
//!
//! # Design Decisions
//! - Counters only; latency is visible through the trace layer
//! - Rejection reasons are a small fixed set, safe as label values

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and start the exposition listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics listener started"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}

/// Count a request entering the admission pipeline.
pub fn record_request() {
    metrics::counter!("gate_requests_total").increment(1);
}

/// Count a terminal rejection.
///
/// `reason` is one of "unauthenticated", "identification_failed",
/// "rate_limited".
pub fn record_rejected(reason: &'static str) {
    metrics::counter!("gate_rejections_total", "reason" => reason).increment(1);
}
