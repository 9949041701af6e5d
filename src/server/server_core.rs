//! Server Core
//!
//! Shared state, router and the server runner with its background sweep.

use axum::{
    http::{HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::core::error::{Result, ResultExt};
use crate::pipeline::EmpathyPipeline;
use crate::server::config::{CorsConfig, ServerConfig};
use crate::server::middleware::{performance_monitor, MetricsState};
use crate::server::routes;
use crate::server::types::ServerStats;
use crate::store::AudioStore;

/// Server state shared across handlers
pub struct ServerState {
    pub config: ServerConfig,
    pub pipeline: EmpathyPipeline,
    pub metrics: Arc<MetricsState>,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig, pipeline: EmpathyPipeline) -> Self {
        Self {
            config,
            pipeline,
            metrics: Arc::new(MetricsState::new()),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get server statistics
    pub async fn get_stats(&self) -> ServerStats {
        let metrics = self.metrics.snapshot().await;
        ServerStats {
            total_requests: metrics.total_requests,
            successful_requests: metrics.successful_requests,
            failed_requests: metrics.failed_requests,
            avg_processing_time_ms: metrics.avg_processing_time(),
            success_rate: metrics.success_rate(),
            uptime: self.uptime().as_secs(),
            requests_by_endpoint: metrics.requests_by_endpoint,
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = cors_layer(&state.config.cors);
    let metrics = Arc::clone(&state.metrics);
    let request_id = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/", get(routes::info::api_info))
        .route("/api", get(routes::info::api_info))
        .route("/health", get(routes::health::health_check))
        .route("/stats", get(routes::stats::get_stats))
        .route("/emotions", get(routes::emotions::list_emotions))
        .route("/detect", post(routes::synthesis::detect))
        .route("/synthesize", post(routes::synthesis::synthesize))
        .route("/audio/:filename", get(routes::audio::get_audio))
        .with_state(state)
        .layer(middleware::from_fn_with_state(metrics, performance_monitor))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors)
}

/// Periodically delete expired artifacts
pub fn spawn_sweeper(
    store: Arc<dyn AudioStore>,
    max_age: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.sweep(max_age)).await {
                Ok(Ok(removed)) if removed > 0 => info!("Sweep removed {} artifacts", removed),
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("Audio sweep failed: {}", e),
                Err(e) => warn!("Audio sweep task failed: {}", e),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Empathy TTS server
pub struct EmpathyServer {
    state: Arc<ServerState>,
}

impl EmpathyServer {
    /// Create a server with the production pipeline
    pub fn new(config: ServerConfig) -> Result<Self> {
        let pipeline = EmpathyPipeline::from_config(&config.engine)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create a server around an existing pipeline
    pub fn with_pipeline(config: ServerConfig, pipeline: EmpathyPipeline) -> Self {
        Self {
            state: Arc::new(ServerState::new(config, pipeline)),
        }
    }

    /// Get server state
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let config = &self.state.config;
        let sweeper = spawn_sweeper(
            Arc::clone(self.state.pipeline.store()),
            config.engine.audio.max_age(),
            config.engine.audio.sweep_interval(),
        );

        let addr = config.address();
        info!("Starting Empathy Engine on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served.context("Server stopped with an error")
    }
}
