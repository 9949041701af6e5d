//! Speech synthesis backends
//!
//! The pipeline only needs "text in, waveform out" at a given rate and
//! volume. Backends implement [`SpeechSynthesizer`].

mod espeak;

pub use espeak::EspeakSynthesizer;

use async_trait::async_trait;

use crate::audio::Waveform;
use crate::core::error::Result;

/// Base text-to-speech capability
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Speak `text`.
    ///
    /// `rate` multiplies the backend's base words-per-minute; `volume` is in
    /// [0.1, 1.0].
    async fn synthesize(&self, text: &str, rate: f32, volume: f32) -> Result<Waveform>;

    /// Rate actually spoken when `rate` is requested.
    ///
    /// Backends with a bounded speed range report the clamped value; the
    /// pipeline makes up the difference in the tempo step.
    fn effective_rate(&self, rate: f32) -> f32 {
        rate
    }
}
