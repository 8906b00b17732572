//! Sauti Core - Narration Assembly Pipeline
//!
//! This crate turns a multi-line script into a single narrated audio
//! buffer: each non-blank line is synthesized through a streaming speech
//! backend, lines are concatenated with configurable inter-line and
//! inter-paragraph silence, and an optional background track is
//! attenuated, looped to length, and overlaid under the narration.
//!
//! # Example
//!
//! ```ignore
//! use sauti_core::{HttpSpeechBackend, NarrationRequest, Narrator, PipelineConfig, VoiceCatalog};
//!
//! let backend = Arc::new(HttpSpeechBackend::new("https://tts.example/synthesize"));
//! let narrator = Narrator::new(PipelineConfig::default(), VoiceCatalog::default(), backend);
//!
//! let request = NarrationRequest {
//!     script: "Hello\nWorld".into(),
//!     voice_code: "en-US-AvaNeural".into(),
//!     speed_percent: 0,
//!     pause_seconds: 1.0,
//!     bgm: None,
//! };
//! let wav = narrator.narrate(&request).await?;
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod mixer;
pub mod pipeline;
pub mod script;
pub mod synth;
pub mod voice;

pub use audio::{AudioEncoder, AudioFormat, AudioSegment};
pub use config::{EmptySynthesisPolicy, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{NarrationRequest, Narrator};
pub use script::{segment_script, ScriptLine};
pub use synth::{HttpSpeechBackend, SpeechBackend, SynthesisChunk, SynthesisRequest};
pub use voice::{VoiceCatalog, VoiceProfile};
