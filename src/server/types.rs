//! Server Types
//!
//! Request/response bodies and the error type handlers return.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::EmotionProfile;
use crate::core::error::TtsError;
use crate::emotion::{EmotionLabel, EmotionSignal};
use crate::pipeline::{SynthesisRequest, SynthesisResult, VocalParameter, DEFAULT_INTENSITY};

/// Synthesis request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    /// Text to speak
    pub text: String,

    /// Emotion to force (skips detection)
    #[serde(default)]
    pub emotion_override: Option<String>,

    /// Intensity multiplier (0.1-2.0)
    #[serde(default)]
    pub intensity: Option<f32>,

    /// Custom file name, without extension
    #[serde(default)]
    pub filename: Option<String>,
}

impl TextInput {
    /// Pipeline request for this body
    pub fn into_request(self) -> SynthesisRequest {
        let mut request = SynthesisRequest::new(self.text)
            .with_intensity(self.intensity.unwrap_or(DEFAULT_INTENSITY));
        if let Some(name) = &self.emotion_override {
            request = request.with_emotion_name(name);
        }
        if let Some(filename) = self.filename {
            request = request.with_filename(filename);
        }
        request
    }
}

/// Vocal parameters as sent over the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VocalParametersBody {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Synthesis response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    pub emotion: EmotionLabel,
    pub confidence: f32,
    pub vocal_parameters: VocalParametersBody,
    pub audio_handle: String,
}

impl From<SynthesisResult> for SynthesizeResponse {
    fn from(result: SynthesisResult) -> Self {
        Self {
            emotion: result.emotion,
            confidence: result.confidence,
            vocal_parameters: VocalParametersBody {
                rate: result.parameters.rate(),
                pitch: result.parameters.pitch(),
                volume: result.parameters.volume(),
            },
            audio_handle: result.audio_handle,
        }
    }
}

/// Detection-only request body
#[derive(Debug, Clone, Deserialize)]
pub struct DetectInput {
    pub text: String,
}

/// Detection-only response body
#[derive(Debug, Clone, Serialize)]
pub struct DetectResponse {
    pub emotion: EmotionLabel,
    pub confidence: f32,
    pub signals: Vec<EmotionSignal>,
}

/// One entry of the emotion catalogue
#[derive(Debug, Clone, Serialize)]
pub struct EmotionEntry {
    pub emotion: EmotionLabel,
    pub description: String,
    pub parameters: VocalParametersBody,
}

impl EmotionEntry {
    pub fn new(emotion: EmotionLabel, profile: &EmotionProfile) -> Self {
        Self {
            emotion,
            description: profile.description.clone(),
            parameters: VocalParametersBody {
                rate: profile.rate,
                pitch: profile.pitch,
                volume: profile.volume,
            },
        }
    }
}

/// Emotion catalogue body
#[derive(Debug, Clone, Serialize)]
pub struct EmotionsResponse {
    pub emotions: Vec<EmotionEntry>,
    pub vocal_parameters: BTreeMap<&'static str, &'static str>,
}

impl EmotionsResponse {
    pub fn new(emotions: Vec<EmotionEntry>) -> Self {
        let vocal_parameters = VocalParameter::ALL
            .iter()
            .map(|p| (p.name(), p.description()))
            .collect();
        Self {
            emotions,
            vocal_parameters,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Service description
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfoResponse {
    pub message: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Server statistics
#[derive(Debug, Clone, Serialize)]
pub struct ServerStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub avg_processing_time_ms: f64,
    pub success_rate: f64,
    pub uptime: u64,
    /// Request counts per route template
    pub requests_by_endpoint: HashMap<String, u64>,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Handler error
#[derive(Debug)]
pub enum ApiError {
    /// Pipeline failure
    Synthesis(TtsError),
    /// Unknown audio handle
    AudioNotFound,
}

impl From<TtsError> for ApiError {
    fn from(err: TtsError) -> Self {
        ApiError::Synthesis(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Synthesis(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Synthesis(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Speech synthesis failed: {}", err),
            ),
            ApiError::AudioNotFound => (StatusCode::NOT_FOUND, "Audio file not found".to_string()),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_defaults() {
        let input: TextInput = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        let request = input.into_request();
        assert_eq!(request.intensity, 1.0);
        assert!(request.emotion_override.is_none());
    }

    #[test]
    fn test_text_input_override() {
        let input: TextInput = serde_json::from_str(
            r#"{"text":"hi","emotion_override":"ANGER","intensity":1.5,"filename":"x"}"#,
        )
        .unwrap();
        let request = input.into_request();
        assert_eq!(request.emotion_override, Some(EmotionLabel::Anger));
        assert_eq!(request.intensity, 1.5);
        assert_eq!(request.filename_hint.as_deref(), Some("x"));
    }

    #[test]
    fn test_null_fields_are_absent() {
        let input: TextInput = serde_json::from_str(
            r#"{"text":"hi","emotion_override":null,"intensity":null,"filename":null}"#,
        )
        .unwrap();
        let request = input.into_request();
        assert!(request.emotion_override.is_none());
        assert_eq!(request.intensity, 1.0);
    }

    #[test]
    fn test_error_statuses() {
        let bad = ApiError::from(TtsError::validation("text", "empty")).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let failed = ApiError::from(TtsError::Internal {
            message: "boom".into(),
        })
        .into_response();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(ApiError::AudioNotFound.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_emotions_response_describes_parameters() {
        let response = EmotionsResponse::new(vec![]);
        assert_eq!(response.vocal_parameters.len(), 3);
        assert!(response.vocal_parameters.contains_key("pitch"));
    }
}
