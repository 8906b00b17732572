//! Sample-rate conversion for ingested audio

use rubato::{FftFixedIn, Resampler};
use tracing::debug;

use crate::audio::AudioSegment;
use crate::error::{Error, Result};

const CHUNK: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Resample a segment to `target_rate`. Returns the input unchanged when
/// the rates already match.
pub fn resample(segment: AudioSegment, target_rate: u32) -> Result<AudioSegment> {
    let from_rate = segment.sample_rate();
    if from_rate == target_rate {
        return Ok(segment);
    }
    if segment.is_empty() {
        return Ok(AudioSegment::empty(target_rate));
    }

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, target_rate as usize, CHUNK, SUB_CHUNKS, 1)
            .map_err(|e| Error::AudioDecode(format!("failed to create resampler: {}", e)))?;

    let samples = segment.samples();
    let expected_len =
        (samples.len() as f64 * target_rate as f64 / from_rate as f64).ceil() as usize;
    let mut out = Vec::with_capacity(expected_len + CHUNK);

    let mut pos = 0;
    while pos < samples.len() {
        let end = (pos + CHUNK).min(samples.len());
        let chunk_len = end - pos;

        // The final chunk is zero-padded up to the fixed input size.
        let mut input_chunk = vec![0.0; CHUNK];
        input_chunk[..chunk_len].copy_from_slice(&samples[pos..end]);

        let block = vec![input_chunk];
        let frames = resampler
            .process(&block, None)
            .map_err(|e| Error::AudioDecode(format!("resampling failed: {}", e)))?;
        out.extend_from_slice(&frames[0]);

        pos += chunk_len;
    }

    // Zero-padding of the tail chunk can overshoot the exact ratio.
    out.truncate(expected_len);

    debug!(
        "resampled {} samples at {} Hz to {} samples at {} Hz",
        samples.len(),
        from_rate,
        out.len(),
        target_rate
    );

    Ok(AudioSegment::from_samples(out, target_rate))
}
