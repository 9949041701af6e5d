//! Audio processing modules
//!
//! - In-memory mono waveform
//! - WAV decoding and 16-bit export
//! - Sample rate conversion
//! - Pitch-preserving tempo change
//! - The pitch-then-tempo transformer

mod codec;
mod resampler;
mod stretch;
mod transform;
mod waveform;

pub use codec::WavCodec;
pub use resampler::Resampler;
pub use stretch::TimeStretcher;
pub use transform::{is_no_op, AudioTransformer, NO_OP_THRESHOLD};
pub use waveform::Waveform;
