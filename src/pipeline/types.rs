//! Pipeline request and result records

use serde::Serialize;
use tracing::warn;

use crate::emotion::EmotionLabel;

use super::mapper::{VocalParameters, DEFAULT_INTENSITY};

/// One synthesis job
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    /// When set, detection is skipped and this label is used with confidence 1.0
    pub emotion_override: Option<EmotionLabel>,
    pub intensity: f32,
    pub filename_hint: Option<String>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emotion_override: None,
            intensity: DEFAULT_INTENSITY,
            filename_hint: None,
        }
    }

    pub fn with_emotion(mut self, emotion: EmotionLabel) -> Self {
        self.emotion_override = Some(emotion);
        self
    }

    /// Override from a caller-supplied name.
    ///
    /// Blank names leave detection on; names outside the label set resolve
    /// to neutral.
    pub fn with_emotion_name(mut self, name: &str) -> Self {
        self.emotion_override = resolve_override(name);
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename_hint = Some(filename.into());
        self
    }
}

/// Resolve an override name; `None` means "detect"
pub fn resolve_override(name: &str) -> Option<EmotionLabel> {
    if name.trim().is_empty() {
        return None;
    }
    Some(EmotionLabel::parse(name).unwrap_or_else(|| {
        warn!("Unknown emotion override '{}', using neutral", name.trim());
        EmotionLabel::Neutral
    }))
}

/// Outcome of one synthesis job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisResult {
    pub emotion: EmotionLabel,
    pub confidence: f32,
    pub parameters: VocalParameters,
    /// Store handle of the produced audio
    pub audio_handle: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = SynthesisRequest::new("hello");
        assert_eq!(request.intensity, 1.0);
        assert!(request.emotion_override.is_none());
        assert!(request.filename_hint.is_none());
    }

    #[test]
    fn test_override_resolution() {
        assert_eq!(resolve_override("ANGER"), Some(EmotionLabel::Anger));
        assert_eq!(resolve_override(" Fear "), Some(EmotionLabel::Fear));
        assert_eq!(resolve_override("ecstatic"), Some(EmotionLabel::Neutral));
        assert_eq!(resolve_override(""), None);
        assert_eq!(resolve_override("  "), None);
    }
}
