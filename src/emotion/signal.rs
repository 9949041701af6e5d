//! Signal adapters
//!
//! Each detection source reports on its own scale. The adapters below bring
//! every source into a common `(label, weight)` vote so fusion can sum them.
//! All three are pure functions of the raw score.

use serde::Serialize;

use super::label::EmotionLabel;

/// Compound score at or beyond which the lexicon source votes joy/sadness
pub const LEXICON_THRESHOLD: f32 = 0.05;
/// Polarity strictly beyond which the polarity source votes joy/sadness
pub const POLARITY_THRESHOLD: f32 = 0.1;

/// Source weights
pub const LEXICON_WEIGHT: f32 = 0.4;
pub const POLARITY_WEIGHT: f32 = 0.3;
pub const CLASSIFIER_WEIGHT: f32 = 0.3;

/// Where a signal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Lexicon,
    Polarity,
    Classifier,
}

/// One adapted vote
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionSignal {
    pub source: SignalSource,
    pub label: EmotionLabel,
    pub weight: f32,
}

/// Raw output of the multi-class classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Label as reported by the classifier, not yet validated
    pub label: String,
    /// Confidence in [0, 1]
    pub score: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Adapt a lexicon compound score in [-1, 1]
pub fn from_lexicon(compound: f32) -> Option<EmotionSignal> {
    if !compound.is_finite() {
        return None;
    }
    let compound = compound.clamp(-1.0, 1.0);
    let label = if compound >= LEXICON_THRESHOLD {
        EmotionLabel::Joy
    } else if compound <= -LEXICON_THRESHOLD {
        EmotionLabel::Sadness
    } else {
        EmotionLabel::Neutral
    };
    Some(EmotionSignal {
        source: SignalSource::Lexicon,
        label,
        weight: compound.abs() * LEXICON_WEIGHT,
    })
}

/// Adapt a polarity score in [-1, 1]
pub fn from_polarity(polarity: f32) -> Option<EmotionSignal> {
    if !polarity.is_finite() {
        return None;
    }
    let polarity = polarity.clamp(-1.0, 1.0);
    let label = if polarity > POLARITY_THRESHOLD {
        EmotionLabel::Joy
    } else if polarity < -POLARITY_THRESHOLD {
        EmotionLabel::Sadness
    } else {
        EmotionLabel::Neutral
    };
    Some(EmotionSignal {
        source: SignalSource::Polarity,
        label,
        weight: polarity.abs() * POLARITY_WEIGHT,
    })
}

/// Adapt a classifier result.
///
/// An unavailable classifier, an unrecognized label or a non-finite score all
/// produce no vote at all, not a zero-weight one.
pub fn from_classifier(classification: Option<&Classification>) -> Option<EmotionSignal> {
    let classification = classification?;
    let label = EmotionLabel::parse(&classification.label)?;
    if !classification.score.is_finite() {
        return None;
    }
    Some(EmotionSignal {
        source: SignalSource::Classifier,
        label,
        weight: classification.score.clamp(0.0, 1.0) * CLASSIFIER_WEIGHT,
    })
}
