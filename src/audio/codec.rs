//! WAV container codec
//!
//! Decoding accepts integer or float PCM with any channel count and mixes it
//! down to mono. Encoding always writes 16-bit mono PCM.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use crate::core::error::{AudioOperation, Result, TtsError};

use super::waveform::Waveform;

/// Full-scale magnitude of 16-bit PCM; decode and encode share it so an
/// untouched waveform re-encodes to the same samples
const I16_SCALE: f32 = 32768.0;

/// WAV encoder/decoder
pub struct WavCodec;

impl WavCodec {
    /// Decode a WAV file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Waveform> {
        let reader = hound::WavReader::open(path.as_ref()).map_err(|e| {
            TtsError::audio(
                AudioOperation::Decoding,
                format!("Failed to open WAV file {:?}: {}", path.as_ref(), e),
            )
        })?;
        Self::decode_reader(reader)
    }

    /// Decode WAV bytes held in memory
    pub fn decode(bytes: &[u8]) -> Result<Waveform> {
        let reader = hound::WavReader::new(Cursor::new(bytes))?;
        Self::decode_reader(reader)
    }

    fn decode_reader<R: Read>(reader: hound::WavReader<R>) -> Result<Waveform> {
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_value))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let mono = if spec.channels > 1 {
            samples
                .chunks(spec.channels as usize)
                .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
                .collect()
        } else {
            samples
        };

        Ok(Waveform::new(mono, spec.sample_rate))
    }

    /// Encode to 16-bit PCM WAV bytes
    pub fn encode(waveform: &Waveform) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write(waveform, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Encode straight into a file
    pub fn save<P: AsRef<Path>>(waveform: &Waveform, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref()).map_err(|e| TtsError::Io {
            message: format!("Failed to create WAV file: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;
        let mut writer = std::io::BufWriter::new(file);
        Self::write(waveform, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write<W: Write + Seek>(waveform: &Waveform, sink: W) -> Result<()> {
        waveform.validate()?;
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let encoding = |e: hound::Error| TtsError::audio(AudioOperation::Encoding, e.to_string());
        let mut writer = hound::WavWriter::new(sink, spec).map_err(encoding)?;
        for &sample in waveform.samples() {
            let scaled = (sample * I16_SCALE).round().clamp(-I16_SCALE, I16_SCALE - 1.0) as i16;
            writer.write_sample(scaled).map_err(encoding)?;
        }
        writer.finalize().map_err(encoding)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize, sample_rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_encode_then_decode() {
        let wave = Waveform::new(sine(2205, 22050), 22050);
        let bytes = WavCodec::encode(&wave).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");

        let decoded = WavCodec::decode(&bytes).unwrap();
        assert_eq!(decoded.sample_rate(), 22050);
        assert_eq!(decoded.len(), wave.len());
        for (a, b) in decoded.samples().iter().zip(wave.samples()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    fn pcm16(samples: &[i16], sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &sample in samples {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn read_pcm16(bytes: &[u8]) -> Vec<i16> {
        hound::WavReader::new(Cursor::new(bytes))
            .unwrap()
            .into_samples::<i16>()
            .map(|s| s.unwrap())
            .collect()
    }

    #[test]
    fn test_pcm16_survives_identity_transform() {
        use crate::audio::AudioTransformer;
        use crate::pipeline::VocalParameters;

        let original: Vec<i16> = vec![0, 1, -1, 1000, -1000, 32767, -32768, 12345, -23456];
        let wave = WavCodec::decode(&pcm16(&original, 16000)).unwrap();

        let wave = AudioTransformer::new()
            .transform(wave, &VocalParameters::new(1.0, 1.0, 0.8))
            .unwrap();
        let bytes = WavCodec::encode(&wave).unwrap();

        assert_eq!(read_pcm16(&bytes), original);
    }

    #[test]
    fn test_encode_rounds_and_clips() {
        let wave = Waveform::new(vec![1.0, -1.0, 1.5, 0.4 / 32768.0, 0.6 / 32768.0], 8000);
        let bytes = WavCodec::encode(&wave).unwrap();
        assert_eq!(read_pcm16(&bytes), vec![32767, -32768, 32767, 0, 1]);
    }

    #[test]
    fn test_stereo_is_mixed_down() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for (l, r) in [(0.5f32, -0.5f32), (0.2, 0.4)] {
                writer.write_sample(l).unwrap();
                writer.write_sample(r).unwrap();
            }
            writer.finalize().unwrap();
        }

        let wave = WavCodec::decode(cursor.get_ref()).unwrap();
        assert_eq!(wave.len(), 2);
        assert!(wave.samples()[0].abs() < 1e-6);
        assert!((wave.samples()[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_save_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        WavCodec::save(&Waveform::new(sine(800, 8000), 8000), &path).unwrap();
        let loaded = WavCodec::load(&path).unwrap();
        assert_eq!(loaded.len(), 800);
    }

    #[test]
    fn test_garbage_is_a_decoding_error() {
        let err = WavCodec::decode(b"definitely not a wav").unwrap_err();
        assert!(matches!(
            err,
            TtsError::Audio {
                operation: AudioOperation::Decoding,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_waveform_is_not_encoded() {
        assert!(WavCodec::encode(&Waveform::new(vec![0.0; 4], 0)).is_err());
    }
}
