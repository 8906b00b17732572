//! Configuration types for the narration pipeline

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Speed offsets outside this range are rejected before synthesis starts.
pub const SPEED_PERCENT_RANGE: std::ops::RangeInclusive<i32> = -50..=50;

/// Maximum inter-line pause in seconds accepted from callers.
pub const MAX_PAUSE_SECONDS: f64 = 5.0;

/// What to do with a line for which the backend produced no audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptySynthesisPolicy {
    /// Contribute no audio and no pause for the line.
    #[default]
    Skip,
    /// Contribute the normal inter-line pause, but no audio.
    PauseOnly,
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sample rate of the assembled timeline; all ingested audio is
    /// resampled to this rate
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Paragraph pauses last this many times the inter-line pause
    #[serde(default = "default_paragraph_pause_ratio")]
    pub paragraph_pause_ratio: f64,

    /// Uniform gain applied to the background track, in dB (negative)
    #[serde(default = "default_bgm_attenuation_db")]
    pub bgm_attenuation_db: f64,

    /// Handling of lines the backend could not voice
    #[serde(default)]
    pub empty_synthesis: EmptySynthesisPolicy,

    /// Per-line synthesis timeout in seconds; None disables the timeout
    #[serde(default = "default_synthesis_timeout_secs")]
    pub synthesis_timeout_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            paragraph_pause_ratio: default_paragraph_pause_ratio(),
            bgm_attenuation_db: default_bgm_attenuation_db(),
            empty_synthesis: EmptySynthesisPolicy::default(),
            synthesis_timeout_secs: default_synthesis_timeout_secs(),
        }
    }
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_paragraph_pause_ratio() -> f64 {
    3.0
}

fn default_bgm_attenuation_db() -> f64 {
    -20.0
}

fn default_synthesis_timeout_secs() -> Option<u64> {
    Some(60)
}

/// Validate caller-supplied speed and pause before any synthesis begins.
pub fn validate_request(speed_percent: i32, pause_seconds: f64) -> Result<()> {
    if !SPEED_PERCENT_RANGE.contains(&speed_percent) {
        return Err(Error::InvalidInput(format!(
            "speed_percent must be within [{}, {}], got {}",
            SPEED_PERCENT_RANGE.start(),
            SPEED_PERCENT_RANGE.end(),
            speed_percent
        )));
    }
    if !pause_seconds.is_finite() || pause_seconds < 0.0 || pause_seconds > MAX_PAUSE_SECONDS {
        return Err(Error::InvalidInput(format!(
            "pause_seconds must be within [0, {}], got {}",
            MAX_PAUSE_SECONDS, pause_seconds
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert!(validate_request(-50, 0.0).is_ok());
        assert!(validate_request(50, 5.0).is_ok());
        assert!(validate_request(0, 1.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_speed() {
        assert!(matches!(
            validate_request(75, 1.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_request(-51, 1.0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_bad_pause() {
        assert!(matches!(
            validate_request(0, -1.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_request(0, 5.5),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_request(0, f64::NAN),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.sample_rate, 24000);
        assert_eq!(config.paragraph_pause_ratio, 3.0);
        assert_eq!(config.bgm_attenuation_db, -20.0);
        assert_eq!(config.empty_synthesis, EmptySynthesisPolicy::Skip);
    }
}
