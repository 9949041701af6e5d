//! Emotion Detection Module
//!
//! Turns free-form text into one emotion decision:
//! - Closed emotion label set
//! - Per-source signal adapters (lexicon, polarity, classifier)
//! - Weighted signal fusion with a deterministic tie-break
//! - Built-in word-list scorers and an HTTP classifier backend

pub mod classifier;
pub mod detector;
pub mod fusion;
pub mod label;
pub mod lexicon;
pub mod signal;
pub mod traits;

pub use classifier::HttpEmotionClassifier;
pub use detector::{Detection, EmotionDetector};
pub use fusion::{fuse, FusionResult};
pub use label::EmotionLabel;
pub use lexicon::{PatternPolarity, VaderLexicon};
pub use signal::{Classification, EmotionSignal, SignalSource};
pub use traits::{EmotionClassifier, PolarityScore, PolarityScorer, SentimentScorer};
