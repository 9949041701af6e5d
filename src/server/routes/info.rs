//! Service Description Route

use axum::Json;
use std::collections::BTreeMap;

use crate::server::types::ApiInfoResponse;

/// API information endpoint
pub async fn api_info() -> Json<ApiInfoResponse> {
    let endpoints = BTreeMap::from([
        ("POST /synthesize", "Convert text to emotionally modulated speech"),
        ("POST /detect", "Detect the emotion of a text without synthesizing"),
        ("GET /emotions", "Get available emotion categories"),
        ("GET /audio/{filename}", "Download a synthesized audio file"),
        ("GET /health", "Health check endpoint"),
        ("GET /stats", "Request statistics"),
    ]);

    Json(ApiInfoResponse {
        message: "Welcome to The Empathy Engine!",
        description: "TTS with emotional voice modulation",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}
