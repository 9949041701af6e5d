//! Parameter mapper
//!
//! Emotion + intensity to bounded vocal parameters:
//! 1. clamp intensity to [0.1, 2.0] (NaN reads as 1.0)
//! 2. look up the base profile, falling back to neutral
//! 3. scale each base value by an affine multiplier of intensity
//! 4. clamp each result to its absolute range

use serde::Serialize;
use std::sync::Arc;

use crate::config::{EmotionProfile, EmotionProfiles};
use crate::emotion::EmotionLabel;

pub const MIN_INTENSITY: f32 = 0.1;
pub const MAX_INTENSITY: f32 = 2.0;
pub const DEFAULT_INTENSITY: f32 = 1.0;

/// Clamp a caller-supplied intensity into range
pub fn clamp_intensity(intensity: f32) -> f32 {
    if intensity.is_nan() {
        DEFAULT_INTENSITY
    } else {
        intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)
    }
}

/// One of the three vocal parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocalParameter {
    Rate,
    Pitch,
    Volume,
}

impl VocalParameter {
    pub const ALL: [VocalParameter; 3] = [
        VocalParameter::Rate,
        VocalParameter::Pitch,
        VocalParameter::Volume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VocalParameter::Rate => "rate",
            VocalParameter::Pitch => "pitch",
            VocalParameter::Volume => "volume",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VocalParameter::Rate => "Speech speed multiplier",
            VocalParameter::Pitch => "Voice pitch multiplier",
            VocalParameter::Volume => "Audio volume level",
        }
    }

    /// Absolute (min, max) range
    pub fn bounds(&self) -> (f32, f32) {
        match self {
            VocalParameter::Rate | VocalParameter::Pitch => (0.5, 2.0),
            VocalParameter::Volume => (0.1, 1.0),
        }
    }

    /// Clamp into the absolute range. NaN lands on the lower bound.
    pub fn clamp(&self, value: f32) -> f32 {
        let (min, max) = self.bounds();
        if value.is_nan() {
            min
        } else {
            value.clamp(min, max)
        }
    }

    /// Intensity multiplier; expects an already clamped intensity
    pub fn multiplier(&self, intensity: f32) -> f32 {
        match self {
            VocalParameter::Rate => 0.7 + 0.3 * intensity,
            VocalParameter::Pitch => 0.85 + 0.3 * intensity,
            VocalParameter::Volume => 0.6 + 0.4 * intensity,
        }
    }

    /// This parameter's base value in a profile
    pub fn base(&self, profile: &EmotionProfile) -> f32 {
        match self {
            VocalParameter::Rate => profile.rate,
            VocalParameter::Pitch => profile.pitch,
            VocalParameter::Volume => profile.volume,
        }
    }
}

/// Rate, pitch and volume, always within bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VocalParameters {
    rate: f32,
    pitch: f32,
    volume: f32,
}

impl VocalParameters {
    /// Build from raw values, clamping each one
    pub fn new(rate: f32, pitch: f32, volume: f32) -> Self {
        Self {
            rate: VocalParameter::Rate.clamp(rate),
            pitch: VocalParameter::Pitch.clamp(pitch),
            volume: VocalParameter::Volume.clamp(volume),
        }
    }

    /// Parameters that leave synthesized audio untouched
    pub fn identity() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn get(&self, parameter: VocalParameter) -> f32 {
        match parameter {
            VocalParameter::Rate => self.rate,
            VocalParameter::Pitch => self.pitch,
            VocalParameter::Volume => self.volume,
        }
    }

    /// Same parameters with a different (clamped) rate
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = VocalParameter::Rate.clamp(rate);
        self
    }
}

/// Maps emotion + intensity onto vocal parameters
#[derive(Debug, Clone)]
pub struct ParameterMapper {
    profiles: Arc<EmotionProfiles>,
}

impl ParameterMapper {
    pub fn new(profiles: Arc<EmotionProfiles>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &EmotionProfiles {
        &self.profiles
    }

    /// Map a label. Total and pure.
    pub fn map(&self, emotion: EmotionLabel, intensity: f32) -> VocalParameters {
        self.map_profile(self.profiles.get(emotion), intensity)
    }

    /// Map a free-form label name; unknown names map as neutral
    pub fn map_name(&self, emotion: &str, intensity: f32) -> VocalParameters {
        self.map_profile(self.profiles.get_by_name(emotion), intensity)
    }

    fn map_profile(&self, profile: &EmotionProfile, intensity: f32) -> VocalParameters {
        let intensity = clamp_intensity(intensity);
        let scaled = |parameter: VocalParameter| {
            parameter.base(profile) * parameter.multiplier(intensity)
        };
        VocalParameters::new(
            scaled(VocalParameter::Rate),
            scaled(VocalParameter::Pitch),
            scaled(VocalParameter::Volume),
        )
    }
}

impl Default for ParameterMapper {
    fn default() -> Self {
        Self::new(Arc::new(EmotionProfiles::default()))
    }
}
