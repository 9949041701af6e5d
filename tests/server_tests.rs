//! HTTP surface tests driven through the router without a socket

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use empathy_tts::server::SynthesizeResponse;
use empathy_tts::{
    EmotionDetector, EmpathyPipeline, EmpathyServer, FileAudioStore, ParameterMapper, Result,
    ServerConfig, SpeechSynthesizer, Waveform,
};

struct SilenceSynthesizer;

#[async_trait]
impl SpeechSynthesizer for SilenceSynthesizer {
    fn name(&self) -> &str {
        "silence"
    }

    async fn synthesize(&self, _text: &str, _rate: f32, _volume: f32) -> Result<Waveform> {
        Ok(Waveform::new(vec![0.0; 8000], 16000))
    }
}

fn app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = EmpathyPipeline::new(
        EmotionDetector::builtin(),
        ParameterMapper::default(),
        Arc::new(SilenceSynthesizer),
        Arc::new(FileAudioStore::new(dir.path()).unwrap()),
    );
    let server = EmpathyServer::with_pipeline(ServerConfig::default(), pipeline);
    (server.router(), dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "empathy-engine");
}

#[tokio::test]
async fn test_emotions_catalogue() {
    let (app, _dir) = app();
    let (status, body) = send(&app, get("/emotions")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let emotions = body["emotions"].as_array().unwrap();
    assert_eq!(emotions.len(), 7);
    assert_eq!(emotions[0]["emotion"], "joy");
    assert!(body["vocal_parameters"]["rate"].is_string());
}

#[tokio::test]
async fn test_synthesize_then_download() {
    let (app, _dir) = app();
    let (status, body) = send(
        &app,
        post_json(
            "/synthesize",
            json!({"text": "Leave now.", "emotion_override": "ANGER", "intensity": 1.0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: SynthesizeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.emotion.name(), "anger");
    assert_eq!(response.confidence, 1.0);
    assert!((response.vocal_parameters.rate - 1.05).abs() < 1e-4);

    let uri = format!("/audio/{}", response.audio_handle);
    let download = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(download.headers()[header::CONTENT_TYPE], "audio/wav");
    let bytes = download.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..4], b"RIFF");
}

#[tokio::test]
async fn test_synthesize_empty_text_is_bad_request() {
    let (app, _dir) = app();
    let (status, body) = send(&app, post_json("/synthesize", json!({"text": ""}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["detail"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_detect() {
    let (app, _dir) = app();
    let (status, body) = send(
        &app,
        post_json("/detect", json!({"text": "I love this wonderful day"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["emotion"], "joy");
    assert!(!body["signals"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_audio_is_not_found() {
    let (app, _dir) = app();
    let (status, body) = send(&app, get("/audio/nothing_here.wav")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["detail"], "Audio file not found");
}

#[tokio::test]
async fn test_traversal_is_not_found() {
    let (app, _dir) = app();
    let (status, _) = send(&app, get("/audio/..%2Foutside.wav")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/audio/..")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_count_requests() {
    let (app, _dir) = app();
    send(&app, get("/health")).await;
    let (status, body) = send(&app, get("/stats")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["total_requests"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_stats_group_requests_by_route() {
    let (app, _dir) = app();
    send(&app, get("/audio/first.wav")).await;
    send(&app, get("/audio/second.wav")).await;
    send(&app, get("/no/such/route")).await;
    let (_, body) = send(&app, get("/stats")).await;

    let body: Value = serde_json::from_slice(&body).unwrap();
    let by_endpoint = body["requests_by_endpoint"].as_object().unwrap();
    assert_eq!(by_endpoint["/audio/:filename"], 2);
    assert_eq!(by_endpoint["unmatched"], 1);
    assert!(by_endpoint.keys().all(|key| !key.contains(".wav")));
}
