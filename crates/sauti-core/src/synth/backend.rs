//! Speech backend seam
//!
//! The streaming synthesis service is an external capability: it accepts
//! `(text, voice, signed rate percent)` and yields a sequence of tagged
//! chunks. Only audio-kind payloads contribute to the segment; anything
//! else (word boundaries, timing marks) is discarded here.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;

/// One line's worth of synthesis input.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Non-empty text; blank lines never reach the backend.
    pub text: String,
    /// Opaque voice code understood by the backend.
    pub voice_code: String,
    /// Speed offset in percent, within [-50, 50].
    pub speed_percent: i32,
}

impl SynthesisRequest {
    /// Rate formatted the way the backend expects: `+10%`, `-5%`, `+0%`.
    pub fn rate_string(&self) -> String {
        format!("{:+}%", self.speed_percent)
    }
}

/// A tagged chunk from the synthesis stream.
#[derive(Debug, Clone)]
pub enum SynthesisChunk {
    /// Compressed audio bytes to concatenate.
    Audio(Bytes),
    /// Non-audio chunk (metadata, timing); ignored by the pipeline.
    Metadata,
}

/// Streaming speech-synthesis backend.
///
/// Implementations must be queried once per line; the caller awaits the
/// stream to completion before decoding, so no partial-chunk processing
/// happens downstream.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn stream_synthesis(
        &self,
        request: &SynthesisRequest,
    ) -> Result<BoxStream<'static, Result<SynthesisChunk>>>;
}

/// HTTP speech backend streaming compressed audio from a remote service.
pub struct HttpSpeechBackend {
    client: Client,
    endpoint: String,
}

impl HttpSpeechBackend {
    /// `endpoint` is the full URL of the service's synthesis route.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SpeechBackend for HttpSpeechBackend {
    async fn stream_synthesis(
        &self,
        request: &SynthesisRequest,
    ) -> Result<BoxStream<'static, Result<SynthesisChunk>>> {
        debug!(
            "requesting synthesis: voice={}, rate={}, {} chars",
            request.voice_code,
            request.rate_string(),
            request.text.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "text": request.text,
                "voice": request.voice_code,
                "rate": request.rate_string(),
            }))
            .send()
            .await?
            .error_for_status()?;

        let stream = async_stream::try_stream! {
            let mut body = response.bytes_stream();
            use futures::StreamExt;
            while let Some(chunk) = body.next().await {
                let bytes = chunk?;
                if !bytes.is_empty() {
                    yield SynthesisChunk::Audio(bytes);
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
