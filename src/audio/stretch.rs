//! Tempo change without pitch change
//!
//! Waveform-similarity overlap-add (WSOLA): Hann-windowed frames are read
//! from the input at `speed` times the output hop, each one nudged within a
//! small tolerance to line up with the previous frame's natural continuation,
//! and overlap-added at a fixed hop. Output length is `len / speed`.

use crate::core::error::{AudioOperation, Result, TtsError};

/// Frame length in seconds
const FRAME_SECONDS: f64 = 0.046;

/// Time stretcher
#[derive(Debug, Clone)]
pub struct TimeStretcher {
    frame_len: usize,
    tolerance: usize,
}

impl TimeStretcher {
    /// Stretcher tuned for speech at `sample_rate`
    pub fn new(sample_rate: u32) -> Self {
        let frame_len = ((sample_rate as f64 * FRAME_SECONDS) as usize).max(16) & !1;
        Self {
            frame_len,
            tolerance: frame_len / 8,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Output length for `len` samples at `speed`
    pub fn output_len(len: usize, speed: f32) -> usize {
        (len as f64 / speed as f64).round() as usize
    }

    /// Change duration by `1 / speed`; `speed > 1` is faster
    pub fn stretch(&self, samples: &[f32], speed: f32) -> Result<Vec<f32>> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(TtsError::audio(
                AudioOperation::TimeStretch,
                format!("invalid speed factor {}", speed),
            ));
        }
        if samples.is_empty() {
            return Ok(vec![]);
        }

        let n = self.frame_len;
        let synthesis_hop = n / 2;
        let analysis_hop = synthesis_hop as f64 * speed as f64;
        let out_len = Self::output_len(samples.len(), speed);

        let window: Vec<f32> = (0..n)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / n as f32;
                0.5 - 0.5 * phase.cos()
            })
            .collect();

        let frames = out_len / synthesis_hop + 2;
        let mut output = vec![0.0f32; frames * synthesis_hop + n];
        let mut weights = vec![0.0f32; output.len()];

        let at = |index: isize| -> f32 {
            if index < 0 {
                0.0
            } else {
                samples.get(index as usize).copied().unwrap_or(0.0)
            }
        };

        let mut previous: Option<isize> = None;
        for k in 0..frames {
            let nominal = (k as f64 * analysis_hop).round() as isize;
            let start = match previous {
                Some(prev) if self.tolerance > 0 => {
                    self.best_offset(&at, prev + synthesis_hop as isize, nominal, synthesis_hop)
                }
                _ => nominal,
            };

            let out_start = k * synthesis_hop;
            for i in 0..n {
                let w = window[i];
                output[out_start + i] += at(start + i as isize) * w;
                weights[out_start + i] += w;
            }
            previous = Some(start);
        }

        for (sample, weight) in output.iter_mut().zip(&weights) {
            if *weight > 1e-3 {
                *sample /= *weight;
            }
        }

        output.truncate(out_len);
        output.resize(out_len, 0.0);
        Ok(output)
    }

    /// Start position near `nominal` whose first `overlap` samples best match
    /// the samples that naturally follow the previous frame
    fn best_offset<F>(&self, at: &F, natural: isize, nominal: isize, overlap: usize) -> isize
    where
        F: Fn(isize) -> f32,
    {
        let tolerance = self.tolerance as isize;
        let mut best = nominal;
        let mut best_score = f32::NEG_INFINITY;
        for delta in -tolerance..=tolerance {
            let candidate = nominal + delta;
            if candidate < 0 {
                continue;
            }
            let score: f32 = (0..overlap as isize)
                .map(|i| at(natural + i) * at(candidate + i))
                .sum();
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, len: usize, sample_rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    fn zero_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count()
    }

    #[test]
    fn test_speedup_shortens() {
        let stretcher = TimeStretcher::new(16000);
        let input = sine(220.0, 16000, 16000);
        let output = stretcher.stretch(&input, 1.25).unwrap();
        assert_eq!(output.len(), 12800);
    }

    #[test]
    fn test_slowdown_lengthens() {
        let stretcher = TimeStretcher::new(16000);
        let input = sine(220.0, 8000, 16000);
        let output = stretcher.stretch(&input, 0.8).unwrap();
        assert_eq!(output.len(), 10000);
    }

    #[test]
    fn test_pitch_is_preserved() {
        let stretcher = TimeStretcher::new(16000);
        let input = sine(220.0, 16000, 16000);
        let output = stretcher.stretch(&input, 1.5).unwrap();

        // Zero-crossing rate per sample tracks frequency, not duration
        let skip = stretcher.frame_len();
        let body = &output[skip..output.len() - skip];
        let rate_in = zero_crossings(&input) as f32 / input.len() as f32;
        let rate_out = zero_crossings(body) as f32 / body.len() as f32;
        assert!((rate_out / rate_in - 1.0).abs() < 0.1, "{} vs {}", rate_out, rate_in);
    }

    #[test]
    fn test_deterministic() {
        let stretcher = TimeStretcher::new(22050);
        let input = sine(180.0, 5000, 22050);
        assert_eq!(
            stretcher.stretch(&input, 1.3).unwrap(),
            stretcher.stretch(&input, 1.3).unwrap()
        );
    }

    #[test]
    fn test_short_and_empty_input() {
        let stretcher = TimeStretcher::new(22050);
        assert!(stretcher.stretch(&[], 1.2).unwrap().is_empty());
        assert_eq!(stretcher.stretch(&[0.1; 10], 2.0).unwrap().len(), 5);
    }

    #[test]
    fn test_invalid_speed() {
        let stretcher = TimeStretcher::new(22050);
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(stretcher.stretch(&[0.0; 100], speed).is_err());
        }
    }
}
