//! Audio artifact store
//!
//! Finished audio is written once and read back by handle (the file name).
//! Generated names carry a timestamp plus a random suffix. A caller-supplied
//! name that already exists is overwritten: last writer wins.

use chrono::Local;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::audio::{WavCodec, Waveform};
use crate::core::error::{AudioOperation, Result, TtsError};

/// Prefix of generated artifact names; only these are swept
pub const ARTIFACT_PREFIX: &str = "empathy_audio_";

/// Artifact file extension
pub const ARTIFACT_EXTENSION: &str = "wav";

/// Artifact storage capability
pub trait AudioStore: Send + Sync {
    /// Persist `waveform`, returning its handle
    fn save(&self, waveform: &Waveform, name_hint: Option<&str>) -> Result<String>;

    /// Location of a stored artifact, if the handle names one
    fn resolve(&self, handle: &str) -> Option<PathBuf>;

    /// Delete generated artifacts older than `max_age`; returns how many
    fn sweep(&self, max_age: Duration) -> Result<usize>;
}

/// Replace characters that are unsafe in file names with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Fresh artifact name, unique even within one second
pub fn generated_name() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}{}_{}.{}",
        ARTIFACT_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S"),
        &suffix[..8],
        ARTIFACT_EXTENSION
    )
}

/// Store writing WAV files into one directory
#[derive(Debug, Clone)]
pub struct FileAudioStore {
    root: PathBuf,
}

impl FileAudioStore {
    /// Open (and create if needed) the store directory
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| TtsError::Io {
            message: format!("Failed to create audio directory: {}", e),
            path: Some(root.clone()),
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name for a save request
    fn file_name(&self, name_hint: Option<&str>) -> Result<String> {
        let hint = name_hint.map(str::trim).filter(|hint| !hint.is_empty());
        let Some(hint) = hint else {
            return Ok(generated_name());
        };

        let mut name = sanitize_filename(hint);
        let extension = format!(".{}", ARTIFACT_EXTENSION);
        if !name.to_ascii_lowercase().ends_with(&extension) {
            name.push_str(&extension);
        }
        if name == extension || name.starts_with('.') {
            return Err(TtsError::validation(
                "filename",
                format!("unusable file name: {}", hint),
            ));
        }
        Ok(name)
    }
}

impl AudioStore for FileAudioStore {
    fn save(&self, waveform: &Waveform, name_hint: Option<&str>) -> Result<String> {
        let name = self.file_name(name_hint)?;
        let path = self.root.join(&name);
        if path.exists() {
            debug!("Overwriting existing artifact {}", name);
        }

        WavCodec::save(waveform, &path).map_err(|e| {
            TtsError::audio(
                AudioOperation::Storage,
                format!("Failed to write {}: {}", name, e),
            )
        })?;
        info!("Audio saved: {} ({:.2}s)", name, waveform.duration());
        Ok(name)
    }

    fn resolve(&self, handle: &str) -> Option<PathBuf> {
        let candidate = Path::new(handle);
        let mut components = candidate.components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return None;
        }

        let path = self.root.join(candidate);
        path.is_file().then_some(path)
    }

    fn sweep(&self, max_age: Duration) -> Result<usize> {
        let now = SystemTime::now();
        let entries = std::fs::read_dir(&self.root).map_err(|e| TtsError::Io {
            message: format!("Failed to list audio directory: {}", e),
            path: Some(self.root.clone()),
        })?;

        let mut removed = 0;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(ARTIFACT_PREFIX) {
                continue;
            }

            let modified = match entry.metadata().and_then(|meta| meta.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("Cannot read age of {:?}: {}", name, e);
                    continue;
                }
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age <= max_age {
                continue;
            }

            match std::fs::remove_file(entry.path()) {
                Ok(()) => {
                    debug!("Removed expired artifact {:?}", name);
                    removed += 1;
                }
                Err(e) => warn!("Failed to remove {:?}: {}", name, e),
            }
        }

        if removed > 0 {
            info!("Cleaned up {} old audio files", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave() -> Waveform {
        Waveform::new(vec![0.0, 0.25, -0.25, 0.0], 8000)
    }

    fn age(path: &Path, secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("  greeting  "), "greeting");
    }

    #[test]
    fn test_generated_name_shape() {
        let name = generated_name();
        assert!(name.starts_with(ARTIFACT_PREFIX));
        assert!(name.ends_with(".wav"));
        // prefix + YYYYmmdd_HHMMSS + _ + 8 hex + .wav
        assert_eq!(name.len(), ARTIFACT_PREFIX.len() + 15 + 1 + 8 + 4);
        assert_ne!(name, generated_name());
    }

    #[test]
    fn test_save_generated_and_custom() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAudioStore::new(dir.path().join("audio")).unwrap();

        let generated = store.save(&wave(), None).unwrap();
        assert!(generated.starts_with(ARTIFACT_PREFIX));
        assert!(store.resolve(&generated).is_some());

        let custom = store.save(&wave(), Some("my:clip")).unwrap();
        assert_eq!(custom, "my_clip.wav");
        assert_eq!(store.save(&wave(), Some("kept.WAV")).unwrap(), "kept.WAV");
        assert!(store.save(&wave(), Some("   ")).unwrap().starts_with(ARTIFACT_PREFIX));
    }

    #[test]
    fn test_custom_name_collision_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAudioStore::new(dir.path()).unwrap();
        store.save(&wave(), Some("same")).unwrap();
        store
            .save(&Waveform::new(vec![0.5; 16], 8000), Some("same"))
            .unwrap();

        let loaded = WavCodec::load(store.resolve("same.wav").unwrap()).unwrap();
        assert_eq!(loaded.len(), 16);
    }

    #[test]
    fn test_unusable_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAudioStore::new(dir.path()).unwrap();
        assert!(store.save(&wave(), Some(".wav")).is_err());
        assert!(store.save(&wave(), Some("..")).is_err());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAudioStore::new(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("secret.wav"), b"x").unwrap();

        assert!(store.resolve("../secret.wav").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("").is_none());
        assert!(store.resolve("missing.wav").is_none());
    }

    #[test]
    fn test_sweep_only_old_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAudioStore::new(dir.path()).unwrap();

        let old = store.save(&wave(), None).unwrap();
        let fresh = store.save(&wave(), None).unwrap();
        let custom = store.save(&wave(), Some("keepsake")).unwrap();
        age(&store.root().join(&old), 3 * 3600);
        age(&store.root().join(&custom), 3 * 3600);

        let removed = store.sweep(Duration::from_secs(3600)).unwrap();
        assert_eq!(removed, 1);
        assert!(store.resolve(&old).is_none());
        assert!(store.resolve(&fresh).is_some());
        assert!(store.resolve(&custom).is_some());
    }

    #[test]
    fn test_sweep_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAudioStore::new(dir.path().join("gone")).unwrap();
        std::fs::remove_dir(store.root()).unwrap();
        assert!(store.sweep(Duration::from_secs(1)).is_err());
    }
}
