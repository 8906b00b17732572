//! Decoding compressed audio bytes into segments
//!
//! Handles both synthesis backend output (typically MP3) and uploaded
//! background tracks (MP3/WAV). Multi-channel sources are downmixed to
//! mono by channel averaging.

use std::io::Cursor;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::audio::AudioSegment;
use crate::error::{Error, Result};

fn downmix<T>(samples: &mut Vec<f32>, buf: &AudioBuffer<T>)
where
    T: symphonia::core::sample::Sample,
    f32: FromSample<T>,
{
    let channels = buf.spec().channels.count();
    if channels == 1 {
        samples.extend(buf.chan(0).iter().map(|v| f32::from_sample(*v)));
        return;
    }
    let frames = buf.frames();
    let scale = 1.0 / channels as f32;
    for i in 0..frames {
        let mut acc = 0.0f32;
        for c in 0..channels {
            acc += f32::from_sample(buf.chan(c)[i]);
        }
        samples.push(acc * scale);
    }
}

fn downmix_ref(samples: &mut Vec<f32>, decoded: AudioBufferRef<'_>) {
    match decoded {
        AudioBufferRef::U8(buf) => downmix(samples, &buf),
        AudioBufferRef::U16(buf) => downmix(samples, &buf),
        AudioBufferRef::U24(buf) => downmix(samples, &buf),
        AudioBufferRef::U32(buf) => downmix(samples, &buf),
        AudioBufferRef::S8(buf) => downmix(samples, &buf),
        AudioBufferRef::S16(buf) => downmix(samples, &buf),
        AudioBufferRef::S24(buf) => downmix(samples, &buf),
        AudioBufferRef::S32(buf) => downmix(samples, &buf),
        AudioBufferRef::F32(buf) => downmix(samples, &buf),
        AudioBufferRef::F64(buf) => downmix(samples, &buf),
    }
}

/// Decode a compressed byte buffer into a mono segment at its native rate.
pub fn decode_bytes(data: &[u8]) -> Result<AudioSegment> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let hint = Hint::new();
    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| Error::AudioDecode(format!("unrecognized audio format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::AudioDecode("no decodable audio track found".into()))?;

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| Error::AudioDecode(format!("unsupported codec: {}", e)))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut samples = Vec::new();

    while let Ok(packet) = format.next_packet() {
        while !format.metadata().is_latest() {
            format.metadata().pop();
        }
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_rate == 0 {
                    sample_rate = decoded.spec().rate;
                }
                downmix_ref(&mut samples, decoded);
            }
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                // Recoverable per the symphonia contract: skip the packet.
                debug!("skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(Error::AudioDecode(e.to_string())),
        }
    }

    if sample_rate == 0 {
        return Err(Error::AudioDecode("source reports no sample rate".into()));
    }

    debug!(
        "decoded {} samples at {} Hz from {} input bytes",
        samples.len(),
        sample_rate,
        data.len()
    );

    Ok(AudioSegment::from_samples(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn wav_bytes(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buffer, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn decodes_mono_wav() {
        let bytes = wav_bytes(&[0, 16384, -16384, 0], 8000, 1);
        let segment = decode_bytes(&bytes).unwrap();
        assert_eq!(segment.sample_rate(), 8000);
        assert_eq!(segment.len(), 4);
        assert!((segment.samples()[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn downmixes_stereo_to_mono() {
        // Two frames of interleaved stereo.
        let bytes = wav_bytes(&[16384, 0, 0, 16384], 8000, 2);
        let segment = decode_bytes(&bytes).unwrap();
        assert_eq!(segment.len(), 2);
        // Each frame averages to quarter scale.
        for &s in segment.samples() {
            assert!((s - 0.25).abs() < 0.01);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_bytes(&[0xde, 0xad, 0xbe, 0xef]).is_err());
    }
}
