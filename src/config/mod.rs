//! Configuration
//!
//! Engine settings and the emotion profile table.

pub mod engine;
pub mod profiles;

pub use engine::{AudioConfig, DetectionConfig, EngineConfig, RateStage, SynthesisConfig};
pub use profiles::{EmotionProfile, EmotionProfiles};
