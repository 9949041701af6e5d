//! Detection collaborator capabilities
//!
//! Each external sentiment/emotion backend is reached through one small
//! trait, so alternate backends swap in without touching fusion or mapping.

use async_trait::async_trait;

use super::signal::Classification;

/// Lexicon-style sentiment scorer producing a compound score in [-1, 1]
pub trait SentimentScorer: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Compound polarity of `text` in [-1, 1]
    fn compound(&self, text: &str) -> f32;
}

/// Polarity/subjectivity pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarityScore {
    /// Polarity in [-1, 1]
    pub polarity: f32,
    /// Subjectivity in [0, 1]; reported but not used by fusion
    pub subjectivity: f32,
}

/// Second polarity scorer
pub trait PolarityScorer: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Score `text`
    fn score(&self, text: &str) -> PolarityScore;
}

/// Optional multi-class emotion classifier.
///
/// Unavailability and every backend failure are reported as `None`; an
/// implementation must bound its own latency.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Best label with its confidence in [0, 1]
    async fn classify(&self, text: &str) -> Option<Classification>;
}
