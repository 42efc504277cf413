//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_sync_operations_total` (counter): engine operations by op, outcome
//! - `route_sync_operation_duration_seconds` (histogram): latency by op
//! - `route_sync_routes` (gauge): stored routes by status

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routes::RouteStatus;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished engine operation.
pub fn record_operation(op: &'static str, outcome: &'static str, started: Instant) {
    ::metrics::counter!("route_sync_operations_total", "op" => op, "outcome" => outcome).increment(1);
    ::metrics::histogram!("route_sync_operation_duration_seconds", "op" => op)
        .record(started.elapsed().as_secs_f64());
}

/// Publish how many stored routes are in each status.
pub fn record_route_counts(counts: &[(RouteStatus, usize)]) {
    for (status, count) in counts {
        ::metrics::gauge!("route_sync_routes", "status" => status.to_string()).set(*count as f64);
    }
}
