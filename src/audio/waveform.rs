//! In-memory mono waveform

use crate::core::error::{AudioOperation, Result, TtsError};

/// Mono f32 samples in [-1, 1] at a fixed sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Peak absolute amplitude
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Reject waveforms no transform can work on
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(TtsError::audio(
                AudioOperation::Decoding,
                "waveform has a zero sample rate",
            ));
        }
        if let Some(index) = self.samples.iter().position(|s| !s.is_finite()) {
            return Err(TtsError::audio(
                AudioOperation::Decoding,
                format!("waveform has a non-finite sample at index {}", index),
            ));
        }
        Ok(())
    }
}
