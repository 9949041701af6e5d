//! Synthesis Routes

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::error::TtsError;
use crate::server::server_core::ServerState;
use crate::server::types::{ApiError, DetectInput, DetectResponse, SynthesizeResponse, TextInput};

/// Log-friendly preview of the request text
fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

/// Convert text to emotionally modulated speech
pub async fn synthesize(
    State(state): State<Arc<ServerState>>,
    Json(input): Json<TextInput>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    info!("Synthesizing speech for text: {}...", preview(&input.text));

    match state.pipeline.run(input.into_request()).await {
        Ok(result) => Ok(Json(result.into())),
        Err(e) => {
            error!("Error synthesizing speech: {}", e);
            Err(e.into())
        }
    }
}

/// Detect the emotion of a text
pub async fn detect(
    State(state): State<Arc<ServerState>>,
    Json(input): Json<DetectInput>,
) -> Result<Json<DetectResponse>, ApiError> {
    if input.text.trim().is_empty() {
        return Err(TtsError::validation("text", "text must not be empty").into());
    }

    let detection = state.pipeline.detect(&input.text).await;
    Ok(Json(DetectResponse {
        emotion: detection.result.emotion,
        confidence: detection.result.confidence,
        signals: detection.signals,
    }))
}
