//! espeak-ng command-line backend
//!
//! Text goes in on stdin, the WAV comes back through a scratch file (a piped
//! WAV carries no usable length header), which is removed afterwards.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::audio::{WavCodec, Waveform};
use crate::config::SynthesisConfig;
use crate::core::error::{Result, SynthesisStage, TtsError};

use super::SpeechSynthesizer;

/// Words-per-minute range espeak accepts
const MIN_WPM: u32 = 80;
const MAX_WPM: u32 = 450;

/// Binaries tried in order when none is configured
const DEFAULT_BINARIES: [&str; 2] = ["espeak-ng", "espeak"];

fn speech_error(message: impl Into<String>) -> TtsError {
    TtsError::synthesis(SynthesisStage::Speech, message)
}

/// Synthesizer driving the espeak-ng CLI
#[derive(Debug, Clone)]
pub struct EspeakSynthesizer {
    binaries: Vec<PathBuf>,
    base_words_per_minute: u32,
    voice: Option<String>,
    timeout: Duration,
    scratch_dir: PathBuf,
}

impl EspeakSynthesizer {
    pub fn new(config: &SynthesisConfig) -> Self {
        let binaries = match &config.espeak_bin {
            Some(bin) => vec![bin.clone()],
            None => DEFAULT_BINARIES.iter().map(PathBuf::from).collect(),
        };
        Self {
            binaries,
            base_words_per_minute: config.base_words_per_minute,
            voice: config.voice.clone(),
            timeout: config.timeout(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Write scratch files somewhere other than the system temp dir
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Speaking speed for a rate multiplier
    pub fn words_per_minute(&self, rate: f32) -> u32 {
        let wpm = (self.base_words_per_minute as f32 * rate).round();
        if wpm.is_finite() {
            (wpm.max(0.0) as u32).clamp(MIN_WPM, MAX_WPM)
        } else {
            self.base_words_per_minute.clamp(MIN_WPM, MAX_WPM)
        }
    }

    /// Rate multiplier espeak really speaks at, given the wpm limits
    pub fn spoken_rate(&self, rate: f32) -> f32 {
        if self.base_words_per_minute == 0 {
            return rate;
        }
        self.words_per_minute(rate) as f32 / self.base_words_per_minute as f32
    }

    /// espeak amplitude (0-200, 100 is normal) for a volume in [0.1, 1.0]
    pub fn amplitude(volume: f32) -> u32 {
        (volume.clamp(0.0, 2.0) * 100.0).round() as u32
    }

    fn arguments(&self, rate: f32, volume: f32, output: &Path) -> Vec<String> {
        let mut args = vec![
            "--stdin".to_string(),
            "-w".to_string(),
            output.to_string_lossy().into_owned(),
            "-s".to_string(),
            self.words_per_minute(rate).to_string(),
            "-a".to_string(),
            Self::amplitude(volume).to_string(),
        ];
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args
    }

    fn spawn(&self, binary: &Path, args: &[String]) -> std::io::Result<Child> {
        Command::new(binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }

    async fn finish(&self, mut child: Child, binary: &Path, text: &str) -> Result<()> {
        if let Some(mut stdin) = child.stdin.take() {
            // A process that exits early closes its stdin; the exit status says why
            if let Err(e) = stdin.write_all(text.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
            drop(stdin);
        }

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TtsError::Timeout {
                    message: format!("{} did not finish", binary.display()),
                    duration_ms: self.timeout.as_millis() as u64,
                })
            }
        };

        if !output.status.success() {
            return Err(speech_error(format!(
                "{} exited with {}: {}",
                binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    fn name(&self) -> &str {
        "espeak"
    }

    fn effective_rate(&self, rate: f32) -> f32 {
        self.spoken_rate(rate)
    }

    async fn synthesize(&self, text: &str, rate: f32, volume: f32) -> Result<Waveform> {
        let scratch = self
            .scratch_dir
            .join(format!("espeak_{}.wav", uuid::Uuid::new_v4().simple()));
        let args = self.arguments(rate, volume, &scratch);

        let mut last_error = speech_error("no synthesizer binary configured");
        for binary in &self.binaries {
            debug!("Running {} {:?}", binary.display(), args);
            let child = match self.spawn(binary, &args) {
                Ok(child) => child,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    last_error =
                        speech_error(format!("{} is not installed", binary.display()));
                    continue;
                }
                Err(e) => {
                    return Err(speech_error(format!(
                        "could not run {}: {}",
                        binary.display(),
                        e
                    )))
                }
            };

            let result = match self.finish(child, binary, text).await {
                Ok(()) => WavCodec::load(&scratch),
                Err(e) => Err(e),
            };
            let _ = tokio::fs::remove_file(&scratch).await;
            return result;
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer() -> EspeakSynthesizer {
        EspeakSynthesizer::new(&SynthesisConfig::default())
    }

    #[test]
    fn test_words_per_minute() {
        let synth = synthesizer();
        assert_eq!(synth.words_per_minute(1.0), 150);
        assert_eq!(synth.words_per_minute(1.3), 195);
        assert_eq!(synth.words_per_minute(0.5), 80);
        assert_eq!(synth.words_per_minute(f32::NAN), 150);
    }

    #[test]
    fn test_spoken_rate_reports_wpm_floor() {
        let synth = synthesizer();
        assert!((synth.spoken_rate(1.2) - 1.2).abs() < 1e-6);
        assert!((synth.spoken_rate(0.5) - 80.0 / 150.0).abs() < 1e-6);
        assert!((synth.effective_rate(0.5) - 80.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_amplitude() {
        assert_eq!(EspeakSynthesizer::amplitude(0.8), 80);
        assert_eq!(EspeakSynthesizer::amplitude(1.0), 100);
    }

    #[test]
    fn test_arguments_include_voice() {
        let config = SynthesisConfig {
            voice: Some("en-us".to_string()),
            ..SynthesisConfig::default()
        };
        let synth = EspeakSynthesizer::new(&config);
        let args = synth.arguments(1.1, 0.9, std::path::Path::new("/tmp/x.wav"));
        assert_eq!(
            args,
            ["--stdin", "-w", "/tmp/x.wav", "-s", "165", "-a", "90", "-v", "en-us"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_speech_error() {
        let config = SynthesisConfig {
            espeak_bin: Some(PathBuf::from("/nonexistent/espeak-ng-binary")),
            ..SynthesisConfig::default()
        };
        let err = EspeakSynthesizer::new(&config)
            .synthesize("hello", 1.0, 0.8)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TtsError::Synthesis {
                stage: SynthesisStage::Speech,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_binary_reports_exit_status() {
        let config = SynthesisConfig {
            espeak_bin: Some(PathBuf::from("false")),
            ..SynthesisConfig::default()
        };
        let err = EspeakSynthesizer::new(&config)
            .synthesize("hello", 1.0, 0.8)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited"));
    }
}
