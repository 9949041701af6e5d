//! Emotion detector
//!
//! Runs every available source over the text, adapts each raw output into a
//! signal and fuses the signals into one decision.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::fusion::{fuse, FusionResult};
use super::lexicon::{PatternPolarity, VaderLexicon};
use super::signal::{self, EmotionSignal};
use super::traits::{EmotionClassifier, PolarityScorer, SentimentScorer};

/// Detection outcome with the votes that produced it
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub result: FusionResult,
    pub signals: Vec<EmotionSignal>,
    /// Subjectivity reported by the polarity source
    pub subjectivity: f32,
}

/// Emotion detector over pluggable sources
#[derive(Clone)]
pub struct EmotionDetector {
    lexicon: Arc<dyn SentimentScorer>,
    polarity: Arc<dyn PolarityScorer>,
    classifier: Option<Arc<dyn EmotionClassifier>>,
}

impl EmotionDetector {
    /// Create a detector from the two always-available sources
    pub fn new(lexicon: Arc<dyn SentimentScorer>, polarity: Arc<dyn PolarityScorer>) -> Self {
        Self {
            lexicon,
            polarity,
            classifier: None,
        }
    }

    /// Detector with the built-in VADER and opinion-word scorers and no classifier
    pub fn builtin() -> Self {
        Self::new(Arc::new(VaderLexicon::new()), Arc::new(PatternPolarity::new()))
    }

    /// Attach the optional classifier
    pub fn with_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Detect the emotion of `text`. Never fails.
    pub async fn detect(&self, text: &str) -> Detection {
        let compound = self.lexicon.compound(text);
        let polarity = self.polarity.score(text);
        let classification = match &self.classifier {
            Some(classifier) => classifier.classify(text).await,
            None => None,
        };

        let signals: Vec<EmotionSignal> = [
            signal::from_lexicon(compound),
            signal::from_polarity(polarity.polarity),
            signal::from_classifier(classification.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let result = fuse(&signals);
        info!(
            "Detected emotion: {} (confidence: {:.2}, signals: {})",
            result.emotion,
            result.confidence,
            signals.len()
        );

        Detection {
            result,
            signals,
            subjectivity: polarity.subjectivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::label::EmotionLabel;
    use crate::emotion::signal::{Classification, SignalSource};
    use crate::emotion::traits::PolarityScore;
    use async_trait::async_trait;

    struct FixedLexicon(f32);

    impl SentimentScorer for FixedLexicon {
        fn name(&self) -> &str {
            "fixed"
        }
        fn compound(&self, _text: &str) -> f32 {
            self.0
        }
    }

    struct FixedPolarity(f32);

    impl PolarityScorer for FixedPolarity {
        fn name(&self) -> &str {
            "fixed"
        }
        fn score(&self, _text: &str) -> PolarityScore {
            PolarityScore {
                polarity: self.0,
                subjectivity: 0.5,
            }
        }
    }

    struct FixedClassifier(Option<Classification>);

    #[async_trait]
    impl EmotionClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn classify(&self, _text: &str) -> Option<Classification> {
            self.0.clone()
        }
    }

    fn detector(compound: f32, polarity: f32) -> EmotionDetector {
        EmotionDetector::new(Arc::new(FixedLexicon(compound)), Arc::new(FixedPolarity(polarity)))
    }

    #[tokio::test]
    async fn test_two_sources_agree() {
        let detection = detector(0.5, 0.5).detect("text").await;
        assert_eq!(detection.result.emotion, EmotionLabel::Joy);
        assert!((detection.result.confidence - 0.35).abs() < 1e-6);
        assert_eq!(detection.signals.len(), 2);
    }

    #[tokio::test]
    async fn test_classifier_vote_can_win() {
        let detector = detector(0.1, 0.05).with_classifier(Arc::new(FixedClassifier(Some(
            Classification::new("anger", 0.95),
        ))));
        let detection = detector.detect("text").await;
        assert_eq!(detection.result.emotion, EmotionLabel::Anger);
        assert!((detection.result.confidence - 0.285).abs() < 1e-6);
        assert_eq!(detection.signals.len(), 3);
        assert_eq!(detection.signals[2].source, SignalSource::Classifier);
    }

    #[tokio::test]
    async fn test_failing_classifier_is_omitted() {
        let with_failure = detector(-0.6, -0.4)
            .with_classifier(Arc::new(FixedClassifier(None)))
            .detect("text")
            .await;
        let without = detector(-0.6, -0.4).detect("text").await;

        assert_eq!(with_failure.signals.len(), 2);
        assert_eq!(with_failure.result, without.result);
        assert_eq!(with_failure.result.emotion, EmotionLabel::Sadness);
    }

    #[tokio::test]
    async fn test_unknown_classifier_label_is_omitted() {
        let detection = detector(0.0, 0.0)
            .with_classifier(Arc::new(FixedClassifier(Some(Classification::new(
                "love", 0.9,
            )))))
            .detect("text")
            .await;
        assert_eq!(detection.signals.len(), 2);
        assert_eq!(detection.result.emotion, EmotionLabel::Neutral);
    }

    #[tokio::test]
    async fn test_builtin_detector_on_plain_text() {
        let detection = EmotionDetector::builtin()
            .detect("The meeting is scheduled for Tuesday at noon.")
            .await;
        assert_eq!(detection.result.emotion, EmotionLabel::Neutral);
    }

    #[tokio::test]
    async fn test_builtin_detector_on_everyday_sentences() {
        let detector = EmotionDetector::builtin();

        let upbeat = detector
            .detect("I'm ecstatic, this promotion is outstanding and I adore it")
            .await;
        assert_eq!(upbeat.result.emotion, EmotionLabel::Joy);
        assert!(upbeat.signals.iter().all(|s| s.label == EmotionLabel::Joy));

        let crushed = detector
            .detect("I feel devastated and heartbroken, everything is ruined")
            .await;
        assert_eq!(crushed.result.emotion, EmotionLabel::Sadness);
        assert!(crushed.signals.iter().all(|s| s.label == EmotionLabel::Sadness));

        let relieved = detector
            .detect("Thank you so much, that was really kind of you")
            .await;
        assert_eq!(relieved.result.emotion, EmotionLabel::Joy);
    }
}
