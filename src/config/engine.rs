//! Engine configuration
//!
//! Everything the pipeline needs, loaded from YAML with environment
//! overrides on top, then frozen behind an `Arc` and shared read-only.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{Result, TtsError};

use super::profiles::EmotionProfiles;

/// Which stage applies the speaking rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateStage {
    /// The synthesizer speaks at the mapped rate; the tempo step only covers
    /// what falls outside the synthesizer's speed range
    #[default]
    Synthesis,
    /// The synthesizer speaks at its base rate; the transformer stretches
    Transform,
}

impl RateStage {
    /// Rates handed to the synthesizer and the transformer, in that order
    pub fn split(&self, rate: f32) -> (f32, f32) {
        match self {
            RateStage::Synthesis => (rate, 1.0),
            RateStage::Transform => (1.0, rate),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base vocal parameters per emotion
    #[serde(default)]
    pub emotions: EmotionProfiles,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub audio: AudioConfig,
}

/// Speech synthesizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Speaking rate at multiplier 1.0
    #[serde(default = "default_words_per_minute")]
    pub base_words_per_minute: u32,

    /// Voice name; the backend default when unset
    #[serde(default)]
    pub voice: Option<String>,

    /// Explicit synthesizer binary; otherwise searched on PATH
    #[serde(default)]
    pub espeak_bin: Option<PathBuf>,

    /// Upper bound on one synthesizer run (seconds)
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub rate_stage: RateStage,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            base_words_per_minute: default_words_per_minute(),
            voice: None,
            espeak_bin: None,
            timeout_secs: default_synthesis_timeout(),
            rate_stage: RateStage::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Emotion detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Consult the multi-class classifier when an endpoint is configured
    #[serde(default = "default_true")]
    pub use_classifier: bool,

    #[serde(default)]
    pub classifier_url: Option<String>,

    #[serde(default)]
    pub classifier_token: Option<String>,

    #[serde(default = "default_classifier_timeout")]
    pub classifier_timeout_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            use_classifier: true,
            classifier_url: None,
            classifier_token: None,
            classifier_timeout_ms: default_classifier_timeout(),
        }
    }
}

impl DetectionConfig {
    /// Endpoint to use, if the classifier is enabled at all
    pub fn classifier_endpoint(&self) -> Option<&str> {
        if self.use_classifier {
            self.classifier_url.as_deref().filter(|url| !url.trim().is_empty())
        } else {
            None
        }
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }
}

/// Artifact store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Container format; only `wav` is produced
    #[serde(default = "default_format")]
    pub format: String,

    /// Artifacts older than this are swept (hours)
    #[serde(default = "default_cleanup_hours")]
    pub cleanup_hours: u64,

    /// Period of the background sweep (seconds)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: default_format(),
            cleanup_hours: default_cleanup_hours(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl AudioConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.cleanup_hours * 3600)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

fn default_words_per_minute() -> u32 {
    150
}

fn default_synthesis_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_classifier_timeout() -> u64 {
    5000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("temp_audio")
}

fn default_format() -> String {
    "wav".to_string()
}

fn default_cleanup_hours() -> u64 {
    24
}

fn default_sweep_interval() -> u64 {
    3600
}

/// Parse a boolean environment value the way the service always has:
/// only a case-insensitive `true` enables.
pub(crate) fn env_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl EngineConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TtsError::Config {
            message: format!("Failed to read config file: {}", e),
            path: Some(path.to_path_buf()),
        })?;
        serde_yaml::from_str(&content).map_err(|e| TtsError::Config {
            message: format!("Failed to parse config YAML: {}", e),
            path: Some(path.to_path_buf()),
        })
    }

    /// Save to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("USE_HUGGING_FACE") {
            self.detection.use_classifier = env_flag(&value);
        }
        if let Some(value) = lookup("EMOTION_CLASSIFIER_URL") {
            self.detection.classifier_url = Some(value);
        }
        if let Some(value) = lookup("AUDIO_CLEANUP_HOURS") {
            self.audio.cleanup_hours = value.trim().parse().map_err(|_| TtsError::Config {
                message: format!("AUDIO_CLEANUP_HOURS is not a whole number: {}", value),
                path: None,
            })?;
        }
        if let Some(value) = lookup("AUDIO_OUTPUT_DIR") {
            self.audio.output_dir = PathBuf::from(value);
        }
        Ok(())
    }
}
