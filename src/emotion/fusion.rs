//! Signal fusion
//!
//! Groups adapted signals by label, sums their weights and picks the label
//! with the largest total. Ties go to the label that comes first in
//! [`EmotionLabel::ALL`] (joy > sadness > anger > fear > surprise > disgust >
//! neutral), independent of the order the signals arrived in.

use serde::Serialize;

use super::label::EmotionLabel;
use super::signal::EmotionSignal;

/// Confidence reported when there is nothing to fuse
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Fused decision.
///
/// `confidence` is an unbounded aggregate of weights, not a probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionResult {
    pub emotion: EmotionLabel,
    pub confidence: f32,
}

impl FusionResult {
    /// Result used when fusion has no input
    pub fn neutral_default() -> Self {
        Self {
            emotion: EmotionLabel::Neutral,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

/// Fuse signals into a single decision. Never fails.
pub fn fuse(signals: &[EmotionSignal]) -> FusionResult {
    let mut totals = [0.0f32; EmotionLabel::ALL.len()];
    let mut present = [false; EmotionLabel::ALL.len()];

    for signal in signals {
        let idx = signal.label.index();
        present[idx] = true;
        totals[idx] += signal.weight;
    }

    let mut best: Option<FusionResult> = None;
    for label in EmotionLabel::ALL {
        let idx = label.index();
        if !present[idx] {
            continue;
        }
        let total = totals[idx];
        match best {
            Some(current) if total <= current.confidence => {}
            _ => {
                best = Some(FusionResult {
                    emotion: label,
                    confidence: total,
                })
            }
        }
    }

    best.unwrap_or_else(FusionResult::neutral_default)
}
