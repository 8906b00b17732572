//! Background music mixing
//!
//! The track is attenuated, looped until it covers the narration, cut to
//! the narration's exact length, and mixed additively under it.

use tracing::debug;

use crate::audio::AudioSegment;
use crate::error::{Error, Result};

/// Overlay an attenuated background track under a narration timeline.
///
/// Pure function of its inputs: same narration, track, and attenuation
/// always produce the same samples. The result has exactly the
/// narration's duration. A zero-duration narration yields a zero-duration
/// result; a zero-duration track is malformed input.
pub fn mix_background(
    narration: &AudioSegment,
    track: &AudioSegment,
    attenuation_db: f64,
) -> Result<AudioSegment> {
    if track.is_empty() {
        return Err(Error::BgmDecode(
            "background track decoded to zero duration".into(),
        ));
    }
    if narration.is_empty() {
        return Ok(narration.clone());
    }

    let attenuated = track.with_gain_db(attenuation_db);

    // Integer division truncates, so one extra repeat guarantees coverage.
    let repeats = narration.len() / attenuated.len() + 1;
    let bed = attenuated.repeated(repeats).truncated(narration.len());

    debug!(
        "mixing {:.2}s track ({} repeats, {:.1} dB) under {:.2}s narration",
        track.duration_secs(),
        repeats,
        attenuation_db,
        narration.duration_secs()
    );

    narration.overlay(&bed)
}
