//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound webhook calls by receiver, status
//! - `gateway_hooks_triggered_total` (counter): hooks handed to delivery
//! - `gateway_hooks_failed_total` (counter): render/endpoint/send failures
//! - `gateway_dispatch_dropped_total` (counter): jobs dropped on queue overflow

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address. A failure to install
/// is logged; the gateway runs without metrics rather than refusing to start.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    if let Err(e) = builder.install() {
        tracing::error!(error = %e, "failed to install Prometheus exporter");
    } else {
        tracing::info!(address = %addr, "metrics endpoint started");
    }
}

pub fn record_request(receiver: &str, status: u16) {
    counter!(
        "gateway_requests_total",
        "receiver" => receiver.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_hook_triggered(hook: &str) {
    counter!("gateway_hooks_triggered_total", "hook" => hook.to_string()).increment(1);
}

pub fn record_hook_failed(hook: &str) {
    counter!("gateway_hooks_failed_total", "hook" => hook.to_string()).increment(1);
}

pub fn record_dispatch_dropped() {
    counter!("gateway_dispatch_dropped_total").increment(1);
}
