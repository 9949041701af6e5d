//! Audio transformer
//!
//! Applies the residual pitch and tempo adjustment to a synthesized waveform.
//! Order is fixed: pitch first, then tempo. Either step is skipped when its
//! factor is within the no-op threshold of 1.0, so near-neutral audio is
//! returned untouched.

use tracing::debug;

use crate::core::error::{AudioOperation, Result, TtsError};
use crate::pipeline::VocalParameters;

use super::resampler::Resampler;
use super::stretch::TimeStretcher;
use super::waveform::Waveform;

/// Absolute distance from 1.0 below which a step is skipped
pub const NO_OP_THRESHOLD: f32 = 0.05;

/// Whether `factor` is close enough to 1.0 to leave audio alone
pub fn is_no_op(factor: f32) -> bool {
    // Tolerate f32 rounding of values like 0.95
    (factor - 1.0).abs() <= NO_OP_THRESHOLD + f32::EPSILON
}

/// Pitch + tempo post-processor
#[derive(Debug, Clone, Default)]
pub struct AudioTransformer;

impl AudioTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Apply `parameters.pitch()` then `parameters.rate()` to `waveform`.
    ///
    /// Volume is not touched here; it is applied at synthesis time.
    pub fn transform(&self, waveform: Waveform, parameters: &VocalParameters) -> Result<Waveform> {
        waveform.validate()?;

        let waveform = self.shift_pitch(waveform, parameters.pitch())?;
        self.change_tempo(waveform, parameters.rate())
    }

    /// Resample-based pitch shift.
    ///
    /// The samples are read as if recorded at `sample_rate * pitch` and
    /// resampled back to `sample_rate`, which raises pitch and shortens
    /// duration together (and the reverse for `pitch < 1`).
    pub fn shift_pitch(&self, waveform: Waveform, pitch: f32) -> Result<Waveform> {
        if is_no_op(pitch) {
            debug!("Pitch {:.3} within no-op threshold, skipping", pitch);
            return Ok(waveform);
        }
        if !pitch.is_finite() || pitch <= 0.0 {
            return Err(TtsError::audio(
                AudioOperation::PitchShift,
                format!("invalid pitch factor {}", pitch),
            ));
        }

        let sample_rate = waveform.sample_rate();
        let shifted_rate = (sample_rate as f64 * pitch as f64).round() as u32;
        if shifted_rate == 0 {
            return Err(TtsError::audio(
                AudioOperation::PitchShift,
                format!("pitch {} collapses sample rate {}", pitch, sample_rate),
            ));
        }

        debug!(
            "Pitch shift x{:.3}: {} Hz -> {} Hz",
            pitch, shifted_rate, sample_rate
        );
        let samples = Resampler::resample(waveform.samples(), shifted_rate, sample_rate)?;
        Ok(Waveform::new(samples, sample_rate))
    }

    /// Duration change by `1 / rate`, pitch preserved
    pub fn change_tempo(&self, waveform: Waveform, rate: f32) -> Result<Waveform> {
        if is_no_op(rate) {
            debug!("Rate {:.3} within no-op threshold, skipping", rate);
            return Ok(waveform);
        }

        let sample_rate = waveform.sample_rate();
        debug!("Tempo change x{:.3} over {} samples", rate, waveform.len());
        let samples = TimeStretcher::new(sample_rate).stretch(waveform.samples(), rate)?;
        Ok(Waveform::new(samples, sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, sample_rate: u32) -> Waveform {
        let samples = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 200.0 * i as f32 / sample_rate as f32).sin() * 0.4)
            .collect();
        Waveform::new(samples, sample_rate)
    }

    #[test]
    fn test_threshold_is_absolute_and_inclusive() {
        assert!(is_no_op(1.0));
        assert!(is_no_op(1.05));
        assert!(is_no_op(0.95));
        assert!(!is_no_op(1.051));
        assert!(!is_no_op(0.9));
    }

    #[test]
    fn test_identity_parameters_leave_samples_identical() {
        let wave = tone(4000, 16000);
        let out = AudioTransformer::new()
            .transform(wave.clone(), &VocalParameters::new(1.0, 1.0, 0.8))
            .unwrap();
        assert_eq!(out, wave);
    }

    #[test]
    fn test_near_unity_is_skipped() {
        let wave = tone(4000, 16000);
        let out = AudioTransformer::new()
            .transform(wave.clone(), &VocalParameters::new(1.04, 0.96, 0.8))
            .unwrap();
        assert_eq!(out.samples(), wave.samples());
    }

    #[test]
    fn test_pitch_up_shortens() {
        let wave = tone(16000, 16000);
        let out = AudioTransformer::new().shift_pitch(wave, 1.25).unwrap();
        assert_eq!(out.sample_rate(), 16000);
        assert_eq!(out.len(), 12800);
    }

    #[test]
    fn test_pitch_down_lengthens() {
        let wave = tone(16000, 16000);
        let out = AudioTransformer::new().shift_pitch(wave, 0.8).unwrap();
        assert_eq!(out.len(), 20000);
    }

    #[test]
    fn test_tempo_only() {
        let wave = tone(16000, 16000);
        let out = AudioTransformer::new()
            .transform(wave, &VocalParameters::new(1.6, 1.0, 1.0))
            .unwrap();
        assert_eq!(out.len(), 10000);
    }

    #[test]
    fn test_pitch_then_tempo() {
        let wave = tone(16000, 16000);
        let out = AudioTransformer::new()
            .transform(wave, &VocalParameters::new(2.0, 1.25, 1.0))
            .unwrap();
        // 16000 / 1.25 = 12800, then / 2.0
        assert_eq!(out.len(), 6400);
    }

    #[test]
    fn test_malformed_waveform_aborts() {
        let wave = Waveform::new(vec![0.1, f32::INFINITY, 0.1], 16000);
        assert!(AudioTransformer::new()
            .transform(wave, &VocalParameters::identity())
            .is_err());
    }
}
