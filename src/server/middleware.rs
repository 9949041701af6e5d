//! Request Metrics Middleware
//!
//! Times every request, records per-endpoint counters and logs slow calls.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Requests slower than this are logged as warnings
const SLOW_REQUEST_MS: f64 = 1000.0;

/// Endpoint key for requests that matched no route
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Server metrics
#[derive(Debug, Default, Clone)]
pub struct ServerMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Total processing time (ms)
    pub total_processing_time_ms: f64,
    /// Keyed by route template, so the key set is bounded by the router
    pub requests_by_endpoint: HashMap<String, u64>,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request
    pub fn record_request(&mut self, endpoint: &str, status: StatusCode, duration_ms: f64) {
        self.total_requests += 1;

        if status.is_success() {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }

        self.total_processing_time_ms += duration_ms;
        *self
            .requests_by_endpoint
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
    }

    /// Get average processing time
    pub fn avg_processing_time(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.total_processing_time_ms / self.total_requests as f64
    }

    /// Success rate in percent
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful_requests as f64 / self.total_requests as f64 * 100.0
    }
}

/// Shared metrics state
#[derive(Debug, Default)]
pub struct MetricsState {
    metrics: RwLock<ServerMetrics>,
}

impl MetricsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counters
    pub async fn snapshot(&self) -> ServerMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn record_request(&self, endpoint: &str, status: StatusCode, duration_ms: f64) {
        let mut metrics = self.metrics.write().await;
        metrics.record_request(endpoint, status, duration_ms);
    }
}

/// Request timing middleware
pub async fn performance_monitor(
    State(metrics): State<Arc<MetricsState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string());
    let method = req.method().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status();
    metrics.record_request(&endpoint, status, duration_ms).await;

    if duration_ms > SLOW_REQUEST_MS {
        warn!(
            "Slow request: {} {} took {:.2}ms (status: {})",
            method, path, duration_ms, status
        );
    } else {
        info!(
            "Request: {} {} took {:.2}ms (status: {})",
            method, path, duration_ms, status
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_rates() {
        let mut metrics = ServerMetrics::new();
        metrics.record_request("/synthesize", StatusCode::OK, 30.0);
        metrics.record_request("/synthesize", StatusCode::INTERNAL_SERVER_ERROR, 10.0);
        metrics.record_request("/health", StatusCode::OK, 2.0);

        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.requests_by_endpoint["/synthesize"], 2);
        assert!((metrics.avg_processing_time() - 14.0).abs() < 1e-9);
        assert!((metrics.success_rate() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_shared_state() {
        let state = MetricsState::new();
        state.record_request("/emotions", StatusCode::OK, 1.0).await;
        assert_eq!(state.snapshot().await.total_requests, 1);
    }
}
