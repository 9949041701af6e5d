//! Audio Download Routes

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::warn;

use crate::server::server_core::ServerState;
use crate::server::types::ApiError;
use crate::store::AudioStore;

/// Serve a stored audio artifact
pub async fn get_audio(
    State(state): State<Arc<ServerState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state
        .pipeline
        .store()
        .resolve(&filename)
        .ok_or(ApiError::AudioNotFound)?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        warn!("Failed to read {:?}: {}", path, e);
        ApiError::AudioNotFound
    })?;

    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', "_"));
    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
