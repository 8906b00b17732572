//! Audio buffer primitives for narration assembly

mod decode;
mod encoder;
mod resample;
mod segment;

pub use decode::decode_bytes;
pub use encoder::{AudioEncoder, AudioFormat};
pub use resample::resample;
pub use segment::AudioSegment;
