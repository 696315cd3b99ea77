//! Audio payloads and container packaging

use crate::error::EngineError;
use bytes::Bytes;
use std::io::Cursor;
use std::path::Path;

/// MIME type for MP3 streams
pub const MIME_MPEG: &str = "audio/mpeg";

/// MIME type for WAV containers
pub const MIME_WAV: &str = "audio/wav";

/// What an engine hands back from a generation call
#[derive(Debug, Clone)]
pub enum EngineAudio {
    /// Raw mono samples; the service packages them into a WAV container
    Samples { pcm: Vec<f32>, sample_rate: u32 },
    /// Audio the engine already packaged (e.g. an MP3 stream)
    Encoded {
        bytes: Bytes,
        mime_type: &'static str,
        sample_rate: u32,
    },
}

/// Package mono f32 samples into a 16-bit PCM WAV container
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Bytes, EngineError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| EngineError::Engine(format!("Failed to start WAV container: {}", e)))?;

    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| EngineError::Engine(format!("Failed to write WAV sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| EngineError::Engine(format!("Failed to finalize WAV container: {}", e)))?;

    Ok(Bytes::from(cursor.into_inner()))
}

/// Read a mono WAV file back into f32 samples and its sample rate
pub fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32), EngineError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| EngineError::Engine(format!("Failed to read WAV output: {}", e)))?;

    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(EngineError::Engine(format!(
            "Expected mono WAV output, got {} channels",
            spec.channels
        )));
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<Vec<f32>, _>>(),
        (hound::SampleFormat::Float, 32) => reader.samples::<f32>().collect(),
        (format, bits) => {
            return Err(EngineError::Engine(format!(
                "Unsupported WAV sample format: {:?} at {} bits",
                format, bits
            )))
        }
    }
    .map_err(|e| EngineError::Engine(format!("Failed to decode WAV samples: {}", e)))?;

    Ok((samples, spec.sample_rate))
}
