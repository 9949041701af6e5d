//! Emotion profile table
//!
//! One base (rate, pitch, volume) triple per emotion label. The table is
//! built once and only read afterwards; `neutral` is always present and is
//! the fallback for every lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{Result, TtsError};
use crate::emotion::EmotionLabel;

/// Base vocal parameters for one emotion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionProfile {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    #[serde(default)]
    pub description: String,
}

impl EmotionProfile {
    pub fn new(rate: f32, pitch: f32, volume: f32, description: impl Into<String>) -> Self {
        Self {
            rate,
            pitch,
            volume,
            description: description.into(),
        }
    }

    fn validate(&self, label: EmotionLabel) -> Result<()> {
        for (name, value) in [
            ("rate", self.rate),
            ("pitch", self.pitch),
            ("volume", self.volume),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TtsError::Config {
                    message: format!("{} profile has invalid {}: {}", label, name, value),
                    path: None,
                });
            }
        }
        Ok(())
    }
}

/// Profile table keyed by label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<EmotionLabel, EmotionProfile>",
    into = "BTreeMap<EmotionLabel, EmotionProfile>"
)]
pub struct EmotionProfiles {
    profiles: BTreeMap<EmotionLabel, EmotionProfile>,
    neutral: EmotionProfile,
}

impl EmotionProfiles {
    /// Build a table; fails when `neutral` is missing or a value is unusable
    pub fn new(profiles: BTreeMap<EmotionLabel, EmotionProfile>) -> Result<Self> {
        let neutral = profiles
            .get(&EmotionLabel::Neutral)
            .cloned()
            .ok_or_else(|| TtsError::Config {
                message: "emotion profile table has no neutral entry".to_string(),
                path: None,
            })?;
        for (label, profile) in &profiles {
            profile.validate(*label)?;
        }
        Ok(Self { profiles, neutral })
    }

    /// Profile for `label`, falling back to neutral
    pub fn get(&self, label: EmotionLabel) -> &EmotionProfile {
        self.profiles.get(&label).unwrap_or(&self.neutral)
    }

    /// Profile for a free-form label name, falling back to neutral
    pub fn get_by_name(&self, name: &str) -> &EmotionProfile {
        match EmotionLabel::parse(name) {
            Some(label) => self.get(label),
            None => &self.neutral,
        }
    }

    pub fn neutral(&self) -> &EmotionProfile {
        &self.neutral
    }

    pub fn contains(&self, label: EmotionLabel) -> bool {
        self.profiles.contains_key(&label)
    }

    /// Configured entries in canonical label order
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, &EmotionProfile)> {
        EmotionLabel::ALL
            .iter()
            .filter_map(move |label| self.profiles.get(label).map(|p| (*label, p)))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for EmotionProfiles {
    fn default() -> Self {
        let profiles = BTreeMap::from([
            (EmotionLabel::Joy, EmotionProfile::new(1.10, 1.05, 0.90, "Happy, enthusiastic")),
            (EmotionLabel::Sadness, EmotionProfile::new(0.90, 0.95, 0.80, "Somber, melancholic")),
            (EmotionLabel::Anger, EmotionProfile::new(1.05, 1.02, 1.00, "Intense, forceful")),
            (EmotionLabel::Fear, EmotionProfile::new(1.15, 1.08, 0.85, "Anxious, nervous")),
            (EmotionLabel::Surprise, EmotionProfile::new(1.08, 1.10, 0.90, "Excited, astonished")),
            (EmotionLabel::Disgust, EmotionProfile::new(0.95, 0.98, 0.85, "Contemptuous, dismissive")),
            (EmotionLabel::Neutral, EmotionProfile::new(1.00, 1.00, 0.80, "Calm, professional")),
        ]);
        let neutral = profiles[&EmotionLabel::Neutral].clone();
        Self { profiles, neutral }
    }
}

impl TryFrom<BTreeMap<EmotionLabel, EmotionProfile>> for EmotionProfiles {
    type Error = TtsError;

    fn try_from(profiles: BTreeMap<EmotionLabel, EmotionProfile>) -> Result<Self> {
        Self::new(profiles)
    }
}

impl From<EmotionProfiles> for BTreeMap<EmotionLabel, EmotionProfile> {
    fn from(table: EmotionProfiles) -> Self {
        table.profiles
    }
}
