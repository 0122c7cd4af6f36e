//! Metrics collection and exposition.
//!
//! # Metrics
//! - `twiml_requests_total` (counter): handled requests by route
//! - `twiml_request_duration_seconds` (histogram): time from request to
//!   closed envelope, by route
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels use the registered route, not the raw request path

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter, scraped at `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &str, start: Instant) {
    let route = route.to_string();
    metrics::counter!("twiml_requests_total", "route" => route.clone()).increment(1);
    metrics::histogram!("twiml_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
