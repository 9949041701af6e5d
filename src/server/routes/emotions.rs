//! Emotion Catalogue Routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::server::server_core::ServerState;
use crate::server::types::{EmotionEntry, EmotionsResponse};

/// List every emotion with its base vocal parameters
pub async fn list_emotions(State(state): State<Arc<ServerState>>) -> Json<EmotionsResponse> {
    let emotions = state
        .pipeline
        .mapper()
        .profiles()
        .iter()
        .map(|(label, profile)| EmotionEntry::new(label, profile))
        .collect();
    Json(EmotionsResponse::new(emotions))
}
