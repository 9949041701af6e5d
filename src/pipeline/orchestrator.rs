//! Pipeline orchestrator
//!
//! Sequences detection (unless overridden), parameter mapping, synthesis,
//! the audio transform and storage for one request.
//!
//! The speaking rate is applied by exactly one stage, chosen by
//! [`RateStage`]; the other stage runs at 1.0.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::audio::AudioTransformer;
use crate::config::{EngineConfig, RateStage};
use crate::core::error::{Result, SynthesisStage, TtsError};
use crate::emotion::{Detection, EmotionDetector, FusionResult, HttpEmotionClassifier};
use crate::store::{AudioStore, FileAudioStore};
use crate::synth::{EspeakSynthesizer, SpeechSynthesizer};

use super::mapper::{ParameterMapper, VocalParameters};
use super::types::{SynthesisRequest, SynthesisResult};

/// Confidence reported for a caller-chosen emotion
pub const OVERRIDE_CONFIDENCE: f32 = 1.0;

/// Text to emotional speech, end to end
#[derive(Clone)]
pub struct EmpathyPipeline {
    detector: EmotionDetector,
    mapper: ParameterMapper,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transformer: AudioTransformer,
    store: Arc<dyn AudioStore>,
    rate_stage: RateStage,
}

impl EmpathyPipeline {
    pub fn new(
        detector: EmotionDetector,
        mapper: ParameterMapper,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn AudioStore>,
    ) -> Self {
        Self {
            detector,
            mapper,
            synthesizer,
            transformer: AudioTransformer::new(),
            store,
            rate_stage: RateStage::default(),
        }
    }

    pub fn with_rate_stage(mut self, rate_stage: RateStage) -> Self {
        self.rate_stage = rate_stage;
        self
    }

    /// Build the production pipeline from configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut detector = EmotionDetector::builtin();
        if let Some(endpoint) = config.detection.classifier_endpoint() {
            let mut classifier =
                HttpEmotionClassifier::new(endpoint, config.detection.classifier_timeout())?;
            if let Some(token) = &config.detection.classifier_token {
                classifier = classifier.with_api_token(token.clone());
            }
            info!("Emotion classifier enabled at {}", endpoint);
            detector = detector.with_classifier(Arc::new(classifier));
        }

        let mapper = ParameterMapper::new(Arc::new(config.emotions.clone()));
        let synthesizer = Arc::new(EspeakSynthesizer::new(&config.synthesis));
        let store = Arc::new(FileAudioStore::new(&config.audio.output_dir)?);

        Ok(Self::new(detector, mapper, synthesizer, store)
            .with_rate_stage(config.synthesis.rate_stage))
    }

    pub fn detector(&self) -> &EmotionDetector {
        &self.detector
    }

    pub fn mapper(&self) -> &ParameterMapper {
        &self.mapper
    }

    pub fn store(&self) -> &Arc<dyn AudioStore> {
        &self.store
    }

    pub fn rate_stage(&self) -> RateStage {
        self.rate_stage
    }

    /// Detect the emotion of `text` without synthesizing
    pub async fn detect(&self, text: &str) -> Detection {
        self.detector.detect(text).await
    }

    /// Emotion decision for a request: the override if present, else fusion
    pub async fn resolve_emotion(&self, request: &SynthesisRequest) -> FusionResult {
        match request.emotion_override {
            Some(emotion) => {
                debug!("Using emotion override: {}", emotion);
                FusionResult {
                    emotion,
                    confidence: OVERRIDE_CONFIDENCE,
                }
            }
            None => self.detector.detect(&request.text).await.result,
        }
    }

    /// Residual rate plus whatever the synthesizer could not reach itself
    fn make_up_rate(&self, speech_rate: f32, residual_rate: f32) -> f32 {
        let spoken = self.synthesizer.effective_rate(speech_rate);
        if !spoken.is_finite() || spoken <= 0.0 || spoken == speech_rate {
            return residual_rate;
        }
        debug!(
            "{} speaks at {:.3} instead of {:.3}; tempo step makes up the rest",
            self.synthesizer.name(),
            spoken,
            speech_rate
        );
        residual_rate * speech_rate / spoken
    }

    /// Run one request to completion
    pub async fn run(&self, request: SynthesisRequest) -> Result<SynthesisResult> {
        if request.text.trim().is_empty() {
            return Err(TtsError::validation("text", "text must not be empty"));
        }
        let start = Instant::now();

        let decision = self.resolve_emotion(&request).await;
        let parameters = self.mapper.map(decision.emotion, request.intensity);
        info!(
            "Vocal parameters for {}: rate={:.3} pitch={:.3} volume={:.3}",
            decision.emotion,
            parameters.rate(),
            parameters.pitch(),
            parameters.volume()
        );

        let (speech_rate, residual_rate) = self.rate_stage.split(parameters.rate());
        let residual_rate = self.make_up_rate(speech_rate, residual_rate);
        let waveform = self
            .synthesizer
            .synthesize(&request.text, speech_rate, parameters.volume())
            .await?;
        debug!(
            "{} produced {:.2}s of audio",
            self.synthesizer.name(),
            waveform.duration()
        );

        let transform: VocalParameters = parameters.with_rate(residual_rate);
        let transformer = self.transformer.clone();
        let store = Arc::clone(&self.store);
        let filename = request.filename_hint.clone();
        let audio_handle = tokio::task::spawn_blocking(move || {
            let waveform = transformer
                .transform(waveform, &transform)
                .map_err(|e| TtsError::synthesis(SynthesisStage::Transform, e.to_string()))?;
            store.save(&waveform, filename.as_deref())
        })
        .await
        .map_err(|e| TtsError::synthesis(SynthesisStage::Export, e.to_string()))??;

        info!(
            "Synthesized {} as {} in {:.2}s",
            decision.emotion,
            audio_handle,
            start.elapsed().as_secs_f32()
        );

        Ok(SynthesisResult {
            emotion: decision.emotion,
            confidence: decision.confidence,
            parameters,
            audio_handle,
        })
    }
}
