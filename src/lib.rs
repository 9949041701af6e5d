//! # Empathy TTS
//!
//! Text-to-speech whose delivery follows the emotion of the text.
//!
//! Several sentiment/emotion sources vote on an emotion label, the votes are
//! fused into one decision, the decision and a caller intensity are mapped
//! onto bounded vocal parameters (rate, pitch, volume), and the synthesized
//! waveform is pitch-shifted and time-stretched to match.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use empathy_tts::{EmpathyPipeline, EngineConfig, SynthesisRequest};
//!
//! let pipeline = EmpathyPipeline::from_config(&EngineConfig::default())?;
//! let result = pipeline
//!     .run(SynthesisRequest::new("What a wonderful day!").with_intensity(1.4))
//!     .await?;
//! println!("{} ({:.2}) -> {}", result.emotion, result.confidence, result.audio_handle);
//! ```
//!
//! ## Emotion Override
//!
//! ```rust,ignore
//! let request = SynthesisRequest::new("Leave me alone.").with_emotion_name("ANGER");
//! let result = pipeline.run(request).await?;
//! assert_eq!(result.confidence, 1.0);
//! ```

pub mod audio;
pub mod config;
pub mod core;
pub mod emotion;
pub mod pipeline;
pub mod server;
pub mod store;
pub mod synth;

// Re-exports for convenience
pub use audio::{AudioTransformer, WavCodec, Waveform};
pub use config::{EmotionProfile, EmotionProfiles, EngineConfig, RateStage};
pub use core::error::{AudioOperation, Result, ResultExt, SynthesisStage, TtsError};
pub use emotion::{
    fuse, EmotionDetector, EmotionLabel, EmotionSignal, FusionResult, SignalSource,
};
pub use pipeline::{
    EmpathyPipeline, ParameterMapper, SynthesisRequest, SynthesisResult, VocalParameter,
    VocalParameters,
};
pub use server::{EmpathyServer, ServerConfig};
pub use store::{AudioStore, FileAudioStore};
pub use synth::{EspeakSynthesizer, SpeechSynthesizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "empathy-engine";
