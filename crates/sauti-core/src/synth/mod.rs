//! Speech segment synthesis

mod backend;

pub use backend::{HttpSpeechBackend, SpeechBackend, SynthesisChunk, SynthesisRequest};

use std::sync::Arc;

use futures::StreamExt;
use tracing::debug;

use crate::audio::{decode_bytes, resample, AudioSegment};
use crate::error::Result;

/// Converts one line of text into a decoded segment via the backend.
pub struct SegmentSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    sample_rate: u32,
}

impl SegmentSynthesizer {
    pub fn new(backend: Arc<dyn SpeechBackend>, sample_rate: u32) -> Self {
        Self {
            backend,
            sample_rate,
        }
    }

    /// Synthesize one line, awaiting the backend's stream to completion.
    ///
    /// Returns `Ok(None)` when the backend yielded no audio bytes (nothing
    /// synthesizable in the text); the assembler treats that as a skip,
    /// not a failure.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_code: &str,
        speed_percent: i32,
    ) -> Result<Option<AudioSegment>> {
        let request = SynthesisRequest {
            text: text.to_string(),
            voice_code: voice_code.to_string(),
            speed_percent,
        };

        let mut stream = self.backend.stream_synthesis(&request).await?;
        let mut audio = Vec::new();
        while let Some(chunk) = stream.next().await {
            match chunk? {
                SynthesisChunk::Audio(bytes) => audio.extend_from_slice(&bytes),
                SynthesisChunk::Metadata => {}
            }
        }

        if audio.is_empty() {
            debug!("backend produced no audio for {:?}", text);
            return Ok(None);
        }

        let segment = decode_bytes(&audio)?;
        let segment = resample(segment, self.sample_rate)?;
        debug!(
            "synthesized {:.2}s of audio for {} chars",
            segment.duration_secs(),
            text.len()
        );
        Ok(Some(segment))
    }
}
