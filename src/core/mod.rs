//! Core framework-level components
//!
//! - `error`: Structured error handling shared by every stage

pub mod error;

pub use error::{AudioOperation, Result, ResultExt, SynthesisStage, TtsError};
