//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hsts_guard_decisions_total` (counter): requests by outcome
//!   (`pass`, `header`, `redirect`, `error`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

const DECISIONS_TOTAL: &str = "hsts_guard_decisions_total";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    ::metrics::describe_counter!(DECISIONS_TOTAL, "Requests by interceptor chain outcome");
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Count one request outcome. A no-op until a recorder is installed.
pub fn record_decision(outcome: &'static str) {
    ::metrics::counter!(DECISIONS_TOTAL, "outcome" => outcome).increment(1);
}
