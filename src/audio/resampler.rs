//! Audio resampling using rubato
//!
//! Sinc interpolation, processed in fixed-size chunks. The filter delay is
//! flushed and trimmed so the output lines up with the input and has exactly
//! `len * to / from` samples.

use rubato::{
    calculate_cutoff, Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

use crate::core::error::{AudioOperation, Result, TtsError};

/// Default chunk size for processing
const CHUNK_SIZE: usize = 1024;

/// Sinc filter length
const SINC_LEN: usize = 128;

/// Upper bound on flush passes after the input runs out
const MAX_FLUSH_PASSES: usize = 8;

fn resampling_error(e: impl std::fmt::Display) -> TtsError {
    TtsError::audio(AudioOperation::Resampling, e.to_string())
}

/// Audio resampler using sinc interpolation
pub struct Resampler;

impl Resampler {
    /// Resample mono audio from one sample rate to another
    pub fn resample(samples: &[f32], from_sr: u32, to_sr: u32) -> Result<Vec<f32>> {
        if from_sr == 0 || to_sr == 0 {
            return Err(resampling_error(format!(
                "invalid sample rates {} -> {}",
                from_sr, to_sr
            )));
        }

        if from_sr == to_sr {
            return Ok(samples.to_vec());
        }

        if samples.is_empty() {
            return Ok(vec![]);
        }

        let window = WindowFunction::Blackman2;
        let params = SincInterpolationParameters {
            sinc_len: SINC_LEN,
            f_cutoff: calculate_cutoff(SINC_LEN, window),
            interpolation: SincInterpolationType::Quadratic,
            oversampling_factor: 256,
            window,
        };

        let ratio = to_sr as f64 / from_sr as f64;
        let mut resampler = SincFixedIn::<f32>::new(ratio, 1.1, params, CHUNK_SIZE, 1)
            .map_err(resampling_error)?;

        let delay = resampler.output_delay();
        let expected = Self::output_len(samples.len(), from_sr, to_sr);
        let mut output_samples = Vec::with_capacity(expected + delay + CHUNK_SIZE);

        let mut chunks = samples.chunks_exact(CHUNK_SIZE);
        for chunk in &mut chunks {
            let output = resampler.process(&[chunk][..], None).map_err(resampling_error)?;
            if let Some(out_chunk) = output.into_iter().next() {
                output_samples.extend(out_chunk);
            }
        }

        let remaining = chunks.remainder();
        if !remaining.is_empty() {
            let output = resampler
                .process_partial(Some(&[remaining][..]), None)
                .map_err(resampling_error)?;
            if let Some(out_chunk) = output.into_iter().next() {
                output_samples.extend(out_chunk);
            }
        }

        // Drain what is still inside the filter
        let mut passes = 0;
        while output_samples.len() < expected + delay && passes < MAX_FLUSH_PASSES {
            let output = resampler
                .process_partial::<&[f32]>(None, None)
                .map_err(resampling_error)?;
            match output.into_iter().next() {
                Some(out_chunk) if !out_chunk.is_empty() => output_samples.extend(out_chunk),
                _ => break,
            }
            passes += 1;
        }

        output_samples.drain(..delay.min(output_samples.len()));
        output_samples.resize(expected, 0.0);
        Ok(output_samples)
    }

    /// Output length for `len` input samples
    pub fn output_len(len: usize, from_sr: u32, to_sr: u32) -> usize {
        if from_sr == 0 {
            return 0;
        }
        (len as f64 * to_sr as f64 / from_sr as f64).round() as usize
    }
}
