//! Encoding assembled timelines to deliverable byte buffers

use hound::{WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

use crate::audio::AudioSegment;
use crate::error::{Error, Result};

/// Supported delivery formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV format (16-bit PCM)
    Wav,
    /// Raw PCM samples (f32)
    RawF32,
    /// Raw PCM samples (i16)
    RawI16,
}

impl AudioFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::RawF32 => "application/octet-stream",
            AudioFormat::RawI16 => "application/octet-stream",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::RawF32 => "pcm_f32le",
            AudioFormat::RawI16 => "pcm_s16le",
        }
    }
}

/// Encoder for rendering a timeline to bytes. Pure transformation; the
/// only failure mode is a container write error.
pub struct AudioEncoder {
    sample_rate: u32,
}

impl AudioEncoder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Encode a segment to the specified format.
    pub fn encode(&self, segment: &AudioSegment, format: AudioFormat) -> Result<Vec<u8>> {
        match format {
            AudioFormat::Wav => self.encode_wav(segment.samples()),
            AudioFormat::RawF32 => Ok(Self::encode_raw_f32(segment.samples())),
            AudioFormat::RawI16 => Ok(Self::encode_raw_i16(segment.samples())),
        }
    }

    fn encode_wav(&self, samples: &[f32]) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer =
                WavWriter::new(&mut buffer, spec).map_err(|e| Error::Export(e.to_string()))?;

            for &sample in samples {
                let sample_i16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                writer
                    .write_sample(sample_i16)
                    .map_err(|e| Error::Export(e.to_string()))?;
            }

            writer
                .finalize()
                .map_err(|e| Error::Export(e.to_string()))?;
        }

        debug!(
            "encoded {} samples to WAV ({} bytes)",
            samples.len(),
            buffer.get_ref().len()
        );
        Ok(buffer.into_inner())
    }

    fn encode_raw_f32(samples: &[f32]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 4);
        for &sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    fn encode_raw_i16(samples: &[f32]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
            bytes.extend_from_slice(&sample_i16.to_le_bytes());
        }
        bytes
    }
}
