//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, status
//! - `proxy_request_duration_seconds` (histogram): handler latency by route
//! - `proxy_upstream_calls_total` (counter): upstream calls by path, outcome
//! - `proxy_upstream_duration_seconds` (histogram): upstream latency by path
//!
//! Recording without an installed exporter is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a handled request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!("proxy_requests_total", "route" => route, "status" => status).increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call and its outcome (`ok` or an error kind).
pub fn record_upstream_call(path: &str, outcome: &'static str, start: Instant) {
    let path = path.to_string();
    metrics::counter!(
        "proxy_upstream_calls_total",
        "path" => path.clone(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("proxy_upstream_duration_seconds", "path" => path)
        .record(start.elapsed().as_secs_f64());
}
