//! Health Check Routes

use axum::Json;

use crate::server::types::HealthResponse;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: crate::SERVICE_NAME.to_string(),
    })
}
