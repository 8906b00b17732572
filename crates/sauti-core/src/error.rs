//! Error types for the Sauti narration pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Synthesis failed for line {line} ({text:?}): {message}")]
    Synthesis {
        line: usize,
        text: String,
        message: String,
    },

    #[error("Audio decoding error: {0}")]
    AudioDecode(String),

    #[error("Background track error: {0}")]
    BgmDecode(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Voice catalog error: {0}")]
    VoiceCatalog(String),

    #[error("Narration cancelled")]
    Cancelled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Tag a backend or decode failure with the offending line's position.
    pub fn synthesis(line: usize, text: &str, message: impl Into<String>) -> Self {
        Error::Synthesis {
            line,
            text: text.to_string(),
            message: message.into(),
        }
    }
}
