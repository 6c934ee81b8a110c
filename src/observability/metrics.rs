//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_dao_calls_total` (counter): downstream calls by route, outcome
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::dao::{DaoError, DaoResponse};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &str, method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "route" => route.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_dao_call(route: &str, result: &Result<DaoResponse, DaoError>) {
    metrics::counter!(
        "gateway_dao_calls_total",
        "route" => route.to_string(),
        "outcome" => dao_outcome(result)
    )
    .increment(1);
}

fn dao_outcome(result: &Result<DaoResponse, DaoError>) -> &'static str {
    match result {
        Ok(response) if response.is_success() => "success",
        Ok(_) => "failure",
        Err(DaoError::Timeout(_)) => "timeout",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::DaoPayload;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[test]
    fn test_dao_outcome_labels() {
        let ok = Ok(DaoResponse::new(StatusCode::OK, DaoPayload::text("")));
        let failed = Ok(DaoResponse::new(StatusCode::BAD_REQUEST, DaoPayload::text("")));
        assert_eq!(dao_outcome(&ok), "success");
        assert_eq!(dao_outcome(&failed), "failure");
        assert_eq!(dao_outcome(&Err(DaoError::Timeout(Duration::from_secs(1)))), "timeout");
        assert_eq!(dao_outcome(&Err(DaoError::Transport("x".into()))), "error");
    }
}
