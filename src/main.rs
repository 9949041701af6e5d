//! Empathy TTS CLI - emotionally modulated text-to-speech
//!
//! Subcommands:
//! - synthesize: text to an emotional WAV file
//! - detect: show the fused emotion decision and its signals
//! - emotions: list the emotion profile table
//! - serve: run the HTTP server
//! - sweep: delete expired audio files once

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use empathy_tts::store::{AudioStore, FileAudioStore};
use empathy_tts::{
    EmpathyPipeline, EmpathyServer, ServerConfig, SynthesisRequest, VocalParameter, VERSION,
};

/// Empathy TTS - speech that sounds the way the text feels
#[derive(Parser, Debug)]
#[command(name = "empathy-tts")]
#[command(author, version, about, long_about = None)]
#[command(about = "Text-to-speech with emotional voice modulation")]
#[command(long_about = "
Empathy TTS detects the emotion of a text (or takes one you choose), maps it
to speaking rate, pitch and volume, and synthesizes speech accordingly.

Examples:
  # Detect the emotion and synthesize
  empathy-tts synthesize --text \"I just got the job!\"

  # Force an emotion at high intensity
  empathy-tts synthesize --text \"Get out.\" --emotion anger --intensity 1.8

  # Run the HTTP server
  empathy-tts serve --port 8000
")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize emotionally modulated speech
    Synthesize {
        /// Text to speak
        #[arg(short, long)]
        text: String,

        /// Emotion to use instead of detecting one
        #[arg(short, long)]
        emotion: Option<String>,

        /// Intensity multiplier (0.1 - 2.0)
        #[arg(short, long, default_value = "1.0")]
        intensity: f32,

        /// Output file name (stored in the audio directory)
        #[arg(short, long)]
        filename: Option<String>,

        /// Audio directory override
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Detect the emotion of a text
    Detect {
        /// Text to analyze
        #[arg(short, long)]
        text: String,
    },

    /// List emotions and their base vocal parameters
    Emotions,

    /// Start the HTTP server
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Delete generated audio older than the retention window
    Sweep {
        /// Retention in hours (defaults to the configured value)
        #[arg(long)]
        max_age_hours: Option<u64>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => ServerConfig::default(),
    };
    config
        .apply_env()
        .context("Invalid environment configuration")?;
    Ok(config)
}

fn setup_logging(verbose: bool, configured: &str) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn create_progress_bar(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    setup_logging(cli.verbose, config.log_level())?;

    info!("Empathy TTS v{}", VERSION);

    match cli.command {
        Commands::Synthesize {
            text,
            emotion,
            intensity,
            filename,
            output_dir,
        } => {
            if let Some(dir) = output_dir {
                config.engine.audio.output_dir = dir;
            }
            let pipeline = EmpathyPipeline::from_config(&config.engine)?;

            let mut request = SynthesisRequest::new(text).with_intensity(intensity);
            if let Some(emotion) = emotion {
                request = request.with_emotion_name(&emotion);
            }
            if let Some(filename) = filename {
                request = request.with_filename(filename);
            }

            let pb = create_progress_bar("Synthesizing...")?;
            let start = Instant::now();
            let result = pipeline.run(request).await;
            pb.finish_and_clear();
            let result = result?;

            info!(
                "Done in {:.2}s: {}",
                start.elapsed().as_secs_f32(),
                config.engine.audio.output_dir.join(&result.audio_handle).display()
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Detect { text } => {
            let pipeline = EmpathyPipeline::from_config(&config.engine)?;
            let detection = pipeline.detect(&text).await;

            println!(
                "Emotion: {} (confidence {:.3})",
                detection.result.emotion, detection.result.confidence
            );
            for signal in &detection.signals {
                println!(
                    "  {:<10} -> {:<8} weight {:.3}",
                    format!("{:?}", signal.source),
                    signal.label,
                    signal.weight
                );
            }
            println!("  subjectivity {:.3}", detection.subjectivity);
        }

        Commands::Emotions => {
            println!(
                "{:<10} {:>6} {:>6} {:>6}  Description",
                "Emotion", "Rate", "Pitch", "Volume"
            );
            for (label, profile) in config.engine.emotions.iter() {
                println!(
                    "{:<10} {:>6.2} {:>6.2} {:>6.2}  {}",
                    label.name(),
                    profile.rate,
                    profile.pitch,
                    profile.volume,
                    profile.description
                );
            }
            println!();
            for parameter in VocalParameter::ALL {
                let (min, max) = parameter.bounds();
                println!(
                    "{:<7} {} ({:.1} - {:.1})",
                    parameter.name(),
                    parameter.description(),
                    min,
                    max
                );
            }
        }

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            EmpathyServer::new(config)?.run().await?;
        }

        Commands::Sweep { max_age_hours } => {
            let hours = max_age_hours.unwrap_or(config.engine.audio.cleanup_hours);
            let store = FileAudioStore::new(&config.engine.audio.output_dir)?;
            let removed = store.sweep(Duration::from_secs(hours * 3600))?;
            println!(
                "Removed {} audio files older than {}h from {}",
                removed,
                hours,
                store.root().display()
            );
        }
    }

    Ok(())
}
