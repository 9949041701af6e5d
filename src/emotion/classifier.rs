//! HTTP emotion classifier
//!
//! Talks to a text-classification endpoint that accepts `{"inputs": text}`
//! and answers with label/score pairs, either flat (`[{..}, ..]`) or nested
//! one level (`[[{..}, ..]]`). Every failure degrades to `None`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::error::{Result, TtsError};

use super::signal::Classification;
use super::traits::EmotionClassifier;

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Pick the highest-scoring label from a response body
fn best_classification(body: &str) -> Option<Classification> {
    let parsed: ClassifyResponse = serde_json::from_str(body).ok()?;
    let candidates = match parsed {
        ClassifyResponse::Nested(mut outer) => {
            if outer.is_empty() {
                return None;
            }
            outer.swap_remove(0)
        }
        ClassifyResponse::Flat(flat) => flat,
    };

    candidates
        .into_iter()
        .filter(|c| c.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| Classification::new(best.label.to_lowercase(), best.score))
}

/// Classifier backed by an HTTP inference endpoint
pub struct HttpEmotionClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpEmotionClassifier {
    /// Create a classifier. `timeout` bounds every request end to end.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TtsError::Config {
                message: format!("Failed to create HTTP client: {}", e),
                path: None,
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token: None,
        })
    }

    /// Send a bearer token with each request
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, text: &str) -> std::result::Result<String, String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("classifier returned {}", status));
        }
        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    fn name(&self) -> &str {
        "http-classifier"
    }

    async fn classify(&self, text: &str) -> Option<Classification> {
        match self.request(text).await {
            Ok(body) => {
                let best = best_classification(&body);
                if best.is_none() {
                    warn!("Emotion classifier returned an unusable body");
                }
                debug!(classification = ?best, "Emotion classifier responded");
                best
            }
            Err(e) => {
                warn!("Emotion classifier failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_body() {
        let body = r#"[[{"label":"joy","score":0.12},{"label":"Fear","score":0.81},{"label":"anger","score":0.07}]]"#;
        let best = best_classification(body).unwrap();
        assert_eq!(best.label, "fear");
        assert!((best.score - 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_flat_body() {
        let body = r#"[{"label":"sadness","score":0.6},{"label":"neutral","score":0.4}]"#;
        assert_eq!(best_classification(body).unwrap().label, "sadness");
    }

    #[test]
    fn test_unusable_bodies() {
        assert!(best_classification("[]").is_none());
        assert!(best_classification("[[]]").is_none());
        assert!(best_classification(r#"{"error":"model loading"}"#).is_none());
        assert!(best_classification("not json").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_none() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let classifier =
            HttpEmotionClassifier::new(format!("http://{}/classify", addr), Duration::from_secs(2))
                .unwrap();
        assert!(classifier.classify("I am so happy").await.is_none());
    }
}
