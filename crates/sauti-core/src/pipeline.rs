//! Narration pipeline
//!
//! Drives segmentation, per-line synthesis, timeline assembly, background
//! mixing, and export for one invocation. Synthesis is strictly sequential
//! and in input order; each line's audio is appended only after every
//! prior line's, so the timeline is deterministic for a given input.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::audio::{decode_bytes, resample, AudioEncoder, AudioFormat, AudioSegment};
use crate::config::{validate_request, EmptySynthesisPolicy, PipelineConfig};
use crate::error::{Error, Result};
use crate::mixer::mix_background;
use crate::script::{segment_script, ScriptLine};
use crate::synth::{SegmentSynthesizer, SpeechBackend};
use crate::voice::VoiceCatalog;

/// Boundary input for one narration invocation.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    /// Raw multi-line script text.
    pub script: String,
    /// Voice code for every speech line.
    pub voice_code: String,
    /// Speed offset in percent, within [-50, 50].
    pub speed_percent: i32,
    /// Inter-line pause in seconds, within [0, 5].
    pub pause_seconds: f64,
    /// Optional compressed background track.
    pub bgm: Option<Bytes>,
}

/// Narration pipeline bound to a speech backend and a voice catalog.
///
/// Holds no per-invocation state; each `narrate` call owns its timeline
/// exclusively, so one narrator can serve concurrent invocations.
pub struct Narrator {
    config: PipelineConfig,
    catalog: VoiceCatalog,
    backend: Arc<dyn SpeechBackend>,
}

impl Narrator {
    pub fn new(
        config: PipelineConfig,
        catalog: VoiceCatalog,
        backend: Arc<dyn SpeechBackend>,
    ) -> Self {
        Self {
            config,
            catalog,
            backend,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Run one invocation to completion, returning the encoded buffer.
    pub async fn narrate(&self, request: &NarrationRequest) -> Result<Vec<u8>> {
        self.narrate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// As `narrate`, but aborts between lines once `cancel` fires.
    pub async fn narrate_with_cancel(
        &self,
        request: &NarrationRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        validate_request(request.speed_percent, request.pause_seconds)?;

        let lines = segment_script(&request.script);
        info!(
            "starting narration: {} lines, voice={}, pause={}s",
            lines.len(),
            request.voice_code,
            request.pause_seconds
        );

        let narration = self.assemble(&lines, request, cancel).await?;

        let mixed = match &request.bgm {
            Some(bytes) => {
                let track =
                    decode_bytes(bytes).map_err(|e| Error::BgmDecode(e.to_string()))?;
                let track = resample(track, self.config.sample_rate)
                    .map_err(|e| Error::BgmDecode(e.to_string()))?;
                mix_background(&narration, &track, self.config.bgm_attenuation_db)?
            }
            None => narration,
        };

        let encoder = AudioEncoder::new(self.config.sample_rate);
        let buffer = encoder.encode(&mixed, AudioFormat::Wav)?;
        info!(
            "narration complete: {:.2}s, {} bytes",
            mixed.duration_secs(),
            buffer.len()
        );
        Ok(buffer)
    }

    /// Assemble the narration timeline, synthesizing lines in order.
    async fn assemble(
        &self,
        lines: &[ScriptLine],
        request: &NarrationRequest,
        cancel: &CancellationToken,
    ) -> Result<AudioSegment> {
        let rate = self.config.sample_rate;
        let normal_pause = AudioSegment::silence(request.pause_seconds, rate);
        let paragraph_pause = AudioSegment::silence(
            request.pause_seconds * self.config.paragraph_pause_ratio,
            rate,
        );

        let synthesizer = SegmentSynthesizer::new(self.backend.clone(), rate);
        let mut timeline = AudioSegment::empty(rate);

        for (index, line) in lines.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            match line {
                ScriptLine::ParagraphBreak => {
                    timeline.append(&paragraph_pause)?;
                }
                ScriptLine::Speech(text) => {
                    let segment = self
                        .synthesize_line(&synthesizer, index, text, request)
                        .await?;
                    match segment {
                        Some(segment) => {
                            timeline.append(&segment)?;
                            timeline.append(&normal_pause)?;
                        }
                        None => match self.config.empty_synthesis {
                            EmptySynthesisPolicy::Skip => {
                                debug!("line {} produced no audio, skipping", index);
                            }
                            EmptySynthesisPolicy::PauseOnly => {
                                timeline.append(&normal_pause)?;
                            }
                        },
                    }
                }
            }
        }

        Ok(timeline)
    }

    async fn synthesize_line(
        &self,
        synthesizer: &SegmentSynthesizer,
        index: usize,
        text: &str,
        request: &NarrationRequest,
    ) -> Result<Option<AudioSegment>> {
        let synthesis =
            synthesizer.synthesize(text, &request.voice_code, request.speed_percent);

        let result = match self.config.synthesis_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), synthesis)
                .await
                .map_err(|_| Error::synthesis(index, text, "synthesis timed out"))?,
            None => synthesis.await,
        };

        result.map_err(|e| match e {
            Error::Synthesis { .. } => e,
            other => Error::synthesis(index, text, other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use async_trait::async_trait;
    use futures::stream::BoxStream;
    use hound::WavReader;

    use super::*;
    use crate::synth::testing::{MockBackend, MockResponse, MOCK_SAMPLE_RATE};
    use crate::synth::{SynthesisChunk, SynthesisRequest};

    const TONE_SECONDS: f64 = 0.5;

    fn narrator(backend: MockBackend) -> Narrator {
        narrator_with(backend, PipelineConfig::default())
    }

    fn narrator_with(backend: MockBackend, mut config: PipelineConfig) -> Narrator {
        // Match the mock's rate so durations stay sample-exact.
        config.sample_rate = MOCK_SAMPLE_RATE;
        Narrator::new(config, VoiceCatalog::default(), Arc::new(backend))
    }

    fn request(script: &str, pause_seconds: f64) -> NarrationRequest {
        NarrationRequest {
            script: script.to_string(),
            voice_code: "en-US-AvaNeural".to_string(),
            speed_percent: 0,
            pause_seconds,
            bgm: None,
        }
    }

    fn decoded_sample_count(wav: &[u8]) -> usize {
        WavReader::new(Cursor::new(wav.to_vec()))
            .unwrap()
            .into_samples::<i16>()
            .count()
    }

    fn seconds(samples: usize) -> f64 {
        samples as f64 / MOCK_SAMPLE_RATE as f64
    }

    #[tokio::test]
    async fn hello_world_duration() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let buffer = narrator
            .narrate(&request("Hello\nWorld", 1.0))
            .await
            .unwrap();
        // synth + 1s pause, twice
        let expected = 2.0 * (TONE_SECONDS + 1.0);
        assert!((seconds(decoded_sample_count(&buffer)) - expected).abs() < 0.001);
    }

    #[tokio::test]
    async fn paragraph_breaks_get_triple_pause() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let buffer = narrator.narrate(&request("A\n\nB", 1.0)).await.unwrap();
        // A + 1s + 3s + B + 1s
        let expected = TONE_SECONDS + 1.0 + 3.0 + TONE_SECONDS + 1.0;
        assert!((seconds(decoded_sample_count(&buffer)) - expected).abs() < 0.001);
    }

    #[tokio::test]
    async fn blank_only_script_is_pure_silence() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let buffer = narrator.narrate(&request("\n\n", 1.0)).await.unwrap();
        // Two blank lines, 3s of paragraph pause each.
        assert!((seconds(decoded_sample_count(&buffer)) - 6.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn empty_script_yields_zero_duration() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let buffer = narrator.narrate(&request("", 1.0)).await.unwrap();
        assert_eq!(decoded_sample_count(&buffer), 0);
    }

    #[tokio::test]
    async fn zero_pause_is_valid() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let buffer = narrator.narrate(&request("Hello", 0.0)).await.unwrap();
        assert!((seconds(decoded_sample_count(&buffer)) - TONE_SECONDS).abs() < 0.001);
    }

    #[tokio::test]
    async fn distinct_line_durations_accumulate() {
        let backend = MockBackend::new(TONE_SECONDS)
            .with_response("A", MockResponse::Tone { seconds: 0.25 })
            .with_response("B", MockResponse::Tone { seconds: 0.75 });
        let narrator = narrator(backend);
        let buffer = narrator.narrate(&request("A\nB", 0.5)).await.unwrap();
        let expected = 0.25 + 0.5 + 0.75 + 0.5;
        assert!((seconds(decoded_sample_count(&buffer)) - expected).abs() < 0.001);
    }

    #[tokio::test]
    async fn unvoiceable_line_is_skipped_without_pause() {
        let backend = MockBackend::new(TONE_SECONDS).with_response("B", MockResponse::Empty);
        let narrator = narrator(backend);
        let buffer = narrator.narrate(&request("A\nB\nC", 1.0)).await.unwrap();
        // A + pause + C + pause; B contributes nothing.
        let expected = 2.0 * (TONE_SECONDS + 1.0);
        assert!((seconds(decoded_sample_count(&buffer)) - expected).abs() < 0.001);
    }

    #[tokio::test]
    async fn pause_only_policy_keeps_the_pause() {
        let backend = MockBackend::new(TONE_SECONDS).with_response("B", MockResponse::Empty);
        let config = PipelineConfig {
            empty_synthesis: EmptySynthesisPolicy::PauseOnly,
            ..PipelineConfig::default()
        };
        let narrator = narrator_with(backend, config);
        let buffer = narrator.narrate(&request("A\nB", 1.0)).await.unwrap();
        let expected = TONE_SECONDS + 1.0 + 1.0;
        assert!((seconds(decoded_sample_count(&buffer)) - expected).abs() < 0.001);
    }

    #[tokio::test]
    async fn synthesis_runs_in_input_order() {
        let backend = Arc::new(MockBackend::new(TONE_SECONDS));
        let narrator = Narrator::new(
            PipelineConfig {
                sample_rate: MOCK_SAMPLE_RATE,
                ..PipelineConfig::default()
            },
            VoiceCatalog::default(),
            backend.clone(),
        );
        narrator
            .narrate(&request("first\n\nsecond\nthird", 0.5))
            .await
            .unwrap();
        assert_eq!(backend.calls(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn failing_line_aborts_with_its_index() {
        let backend =
            MockBackend::new(TONE_SECONDS).with_response("B", MockResponse::Fail("boom".into()));
        let narrator = narrator(backend);
        let err = narrator
            .narrate(&request("A\nB\nC", 1.0))
            .await
            .unwrap_err();
        match err {
            Error::Synthesis { line, text, .. } => {
                assert_eq!(line, 1);
                assert_eq!(text, "B");
            }
            other => panic!("expected Synthesis error, got {other}"),
        }
    }

    #[tokio::test]
    async fn rejects_out_of_range_speed() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let mut req = request("Hello", 1.0);
        req.speed_percent = 75;
        assert!(matches!(
            narrator.narrate(&req).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn rejects_negative_pause() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        assert!(matches!(
            narrator.narrate(&request("Hello", -1.0)).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn mixes_background_to_narration_duration() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let mut req = request("Hello\nWorld", 1.0);
        req.bgm = Some(Bytes::from(MockBackend::tone_wav(0.2)));
        let buffer = narrator.narrate(&req).await.unwrap();
        let expected = 2.0 * (TONE_SECONDS + 1.0);
        assert!((seconds(decoded_sample_count(&buffer)) - expected).abs() < 0.001);
    }

    #[tokio::test]
    async fn undecodable_background_is_fatal() {
        let narrator = narrator(MockBackend::new(TONE_SECONDS));
        let mut req = request("Hello", 1.0);
        req.bgm = Some(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]));
        assert!(matches!(
            narrator.narrate(&req).await,
            Err(Error::BgmDecode(_))
        ));
    }

    #[tokio::test]
    async fn cancelled_token_aborts_before_synthesis() {
        let backend = Arc::new(MockBackend::new(TONE_SECONDS));
        let narrator = Narrator::new(
            PipelineConfig {
                sample_rate: MOCK_SAMPLE_RATE,
                ..PipelineConfig::default()
            },
            VoiceCatalog::default(),
            backend.clone(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = narrator
            .narrate_with_cancel(&request("Hello", 1.0), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(backend.calls().is_empty());
    }

    struct StalledBackend;

    #[async_trait]
    impl SpeechBackend for StalledBackend {
        async fn stream_synthesis(
            &self,
            _request: &SynthesisRequest,
        ) -> crate::error::Result<BoxStream<'static, crate::error::Result<SynthesisChunk>>>
        {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("test backend never responds");
        }
    }

    #[tokio::test]
    async fn per_line_timeout_is_a_synthesis_failure() {
        let config = PipelineConfig {
            sample_rate: MOCK_SAMPLE_RATE,
            synthesis_timeout_secs: Some(1),
            ..PipelineConfig::default()
        };
        let narrator = Narrator::new(config, VoiceCatalog::default(), Arc::new(StalledBackend));
        let err = narrator
            .narrate(&request("Hello", 1.0))
            .await
            .unwrap_err();
        match err {
            Error::Synthesis { line, message, .. } => {
                assert_eq!(line, 0);
                assert!(message.contains("timed out"));
            }
            other => panic!("expected Synthesis error, got {other}"),
        }
    }
}
