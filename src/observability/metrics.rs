//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tasks_requests_total` (counter): requests by method, route, status
//! - `tasks_request_duration_seconds` (histogram): latency distribution
//! - `tasks_store_records` (gauge): records per collection

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// `route` is the matched pattern, never the raw path, to bound label cardinality.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "tasks_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "tasks_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_store_size(collection: &str, records: usize) {
    ::metrics::gauge!("tasks_store_records", "collection" => collection.to_string()).set(records as f64);
}
