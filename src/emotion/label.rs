//! Emotion labels
//!
//! The closed set of categorical tags the pipeline reasons about. Variant
//! order doubles as the fusion tie-break priority.

use serde::{Deserialize, Serialize};

/// Emotion label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    /// Happy, enthusiastic
    Joy,
    /// Somber, melancholic
    Sadness,
    /// Intense, forceful
    Anger,
    /// Anxious, nervous
    Fear,
    /// Excited, astonished
    Surprise,
    /// Contemptuous, dismissive
    Disgust,
    /// Calm, professional
    Neutral,
}

impl EmotionLabel {
    /// Every label, highest tie-break priority first
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Joy,
        EmotionLabel::Sadness,
        EmotionLabel::Anger,
        EmotionLabel::Fear,
        EmotionLabel::Surprise,
        EmotionLabel::Disgust,
        EmotionLabel::Neutral,
    ];

    /// Get label name
    pub fn name(&self) -> &'static str {
        match self {
            EmotionLabel::Joy => "joy",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Neutral => "neutral",
        }
    }

    /// Position in [`EmotionLabel::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything outside the closed set; callers treat that
    /// as an absent signal rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|label| label.name() == s)
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for EmotionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown emotion label: {}", s))
    }
}
