//! In-memory audio segments
//!
//! The timeline is built from mono f32 buffers at a single sample rate.
//! Composition is limited to appending, gain, truncation, looping, and
//! equal-length additive overlay; there is no random-access editing.

use crate::error::{Error, Result};

/// A decoded, in-memory unit of mono audio with a known duration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSegment {
    /// Wrap existing samples. The rate must be nonzero.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0);
        Self {
            samples,
            sample_rate,
        }
    }

    /// A zero-duration segment, the identity for appends.
    pub fn empty(sample_rate: u32) -> Self {
        Self::from_samples(Vec::new(), sample_rate)
    }

    /// A silent segment of the given duration. `seconds = 0` yields an
    /// empty segment.
    pub fn silence(seconds: f64, sample_rate: u32) -> Self {
        let count = (seconds * sample_rate as f64).round() as usize;
        Self::from_samples(vec![0.0; count], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_secs() * 1000.0
    }

    /// Append another segment in place. Rates must match; the pipeline
    /// resamples on ingest so this holds by construction.
    pub fn append(&mut self, other: &AudioSegment) -> Result<()> {
        if other.sample_rate != self.sample_rate {
            return Err(Error::AudioDecode(format!(
                "sample rate mismatch on append: {} vs {}",
                self.sample_rate, other.sample_rate
            )));
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Uniform gain in decibels; negative attenuates.
    pub fn with_gain_db(&self, db: f64) -> AudioSegment {
        let factor = 10f64.powf(db / 20.0) as f32;
        let samples = self.samples.iter().map(|s| s * factor).collect();
        Self::from_samples(samples, self.sample_rate)
    }

    /// Cut to at most `len` samples, discarding the tail.
    pub fn truncated(&self, len: usize) -> AudioSegment {
        let mut samples = self.samples.clone();
        samples.truncate(len);
        Self::from_samples(samples, self.sample_rate)
    }

    /// Concatenate `repeats` copies of this segment.
    pub fn repeated(&self, repeats: usize) -> AudioSegment {
        let mut samples = Vec::with_capacity(self.samples.len() * repeats);
        for _ in 0..repeats {
            samples.extend_from_slice(&self.samples);
        }
        Self::from_samples(samples, self.sample_rate)
    }

    /// Sample-wise additive mix of two equal-length segments.
    pub fn overlay(&self, other: &AudioSegment) -> Result<AudioSegment> {
        if other.sample_rate != self.sample_rate {
            return Err(Error::AudioDecode(format!(
                "sample rate mismatch on overlay: {} vs {}",
                self.sample_rate, other.sample_rate
            )));
        }
        if other.len() != self.len() {
            return Err(Error::AudioDecode(format!(
                "length mismatch on overlay: {} vs {} samples",
                self.len(),
                other.len()
            )));
        }
        let samples = self
            .samples
            .iter()
            .zip(other.samples.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self::from_samples(samples, self.sample_rate))
    }
}
