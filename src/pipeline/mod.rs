//! Emotion-to-speech pipeline
//!
//! Parameter mapping, the request/result records and the orchestrator that
//! ties detection, synthesis, transform and storage together.

pub mod mapper;
pub mod orchestrator;
pub mod types;

pub use mapper::{
    clamp_intensity, ParameterMapper, VocalParameter, VocalParameters, DEFAULT_INTENSITY,
    MAX_INTENSITY, MIN_INTENSITY,
};
pub use orchestrator::{EmpathyPipeline, OVERRIDE_CONFIDENCE};
pub use types::{resolve_override, SynthesisRequest, SynthesisResult};
