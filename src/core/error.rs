//! Structured error handling for the empathy pipeline
//!
//! Only true backend failures surface as errors. Signal unavailability and
//! out-of-range numeric input are absorbed inside detection and mapping, so
//! nothing here describes them.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with TtsError
pub type Result<T> = std::result::Result<T, TtsError>;

/// Main error type for the crate
#[derive(Error, Debug, Clone)]
pub enum TtsError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Synthesis pipeline errors
    #[error("Synthesis error in {stage}: {message}")]
    Synthesis {
        stage: SynthesisStage,
        message: String,
    },

    /// Audio processing errors
    #[error("Audio processing error ({operation}): {message}")]
    Audio {
        message: String,
        operation: AudioOperation,
    },

    /// Request validation errors
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Timeout errors
    #[error("Operation timeout: {message} ({duration_ms}ms)")]
    Timeout {
        message: String,
        duration_ms: u64,
    },

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl TtsError {
    /// Shorthand for an audio processing failure
    pub fn audio(operation: AudioOperation, message: impl Into<String>) -> Self {
        TtsError::Audio {
            message: message.into(),
            operation,
        }
    }

    /// Shorthand for a synthesis stage failure
    pub fn synthesis(stage: SynthesisStage, message: impl Into<String>) -> Self {
        TtsError::Synthesis {
            stage,
            message: message.into(),
        }
    }

    /// Shorthand for a validation failure on a named field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        TtsError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, TtsError::Validation { .. })
    }
}

/// Pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisStage {
    Speech,
    Transform,
    Export,
}

impl fmt::Display for SynthesisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisStage::Speech => write!(f, "speech synthesis"),
            SynthesisStage::Transform => write!(f, "audio transform"),
            SynthesisStage::Export => write!(f, "audio export"),
        }
    }
}

/// Audio operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOperation {
    Decoding,
    PitchShift,
    TimeStretch,
    Resampling,
    Encoding,
    Storage,
}

impl fmt::Display for AudioOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOperation::Decoding => write!(f, "decoding"),
            AudioOperation::PitchShift => write!(f, "pitch shift"),
            AudioOperation::TimeStretch => write!(f, "time stretch"),
            AudioOperation::Resampling => write!(f, "resampling"),
            AudioOperation::Encoding => write!(f, "encoding"),
            AudioOperation::Storage => write!(f, "storage"),
        }
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add a simple message context
    fn context(self, msg: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TtsError::Internal {
            message: format!("{}: {}", f(), e),
        })
    }

    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| TtsError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

/// Convert from hound::Error
impl From<hound::Error> for TtsError {
    fn from(err: hound::Error) -> Self {
        TtsError::Audio {
            message: err.to_string(),
            operation: AudioOperation::Decoding,
        }
    }
}

/// Convert from serde_yaml::Error
impl From<serde_yaml::Error> for TtsError {
    fn from(err: serde_yaml::Error) -> Self {
        TtsError::Config {
            message: err.to_string(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TtsError::Config {
            message: "neutral profile missing".to_string(),
            path: Some(PathBuf::from("engine.yaml")),
        };
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("neutral profile missing"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(SynthesisStage::Speech.to_string(), "speech synthesis");
        let err = TtsError::synthesis(SynthesisStage::Transform, "bad waveform");
        assert_eq!(err.to_string(), "Synthesis error in audio transform: bad waveform");
    }

    #[test]
    fn test_audio_error_display() {
        let err = TtsError::audio(AudioOperation::PitchShift, "zero sample rate");
        assert_eq!(
            err.to_string(),
            "Audio processing error (pitch shift): zero sample rate"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(TtsError::validation("text", "empty").is_client_error());
        assert!(!TtsError::Internal { message: "x".into() }.is_client_error());
    }

    #[test]
    fn test_result_ext_context() {
        let failed: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let err = failed.context("writing artifact").unwrap_err();
        assert!(err.to_string().contains("writing artifact: disk full"));
    }
}
