//! Voice catalog: static reference data describing available voices
//!
//! The catalog is supplied to the pipeline and server as configuration so
//! tests and deployments can substitute their own voice sets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A synthesis voice: a stable backend code plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Opaque code understood by the speech backend
    pub code: String,
    /// Human-readable label, presentation-only
    pub label: String,
}

impl VoiceProfile {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Ordered set of voices offered to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCatalog {
    voices: Vec<VoiceProfile>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self {
            voices: vec![
                VoiceProfile::new("ko-KR-SunHiNeural", "Korean female (SunHi)"),
                VoiceProfile::new("ko-KR-InJunNeural", "Korean male (InJun)"),
                VoiceProfile::new("en-US-AvaNeural", "English female (Ava)"),
                VoiceProfile::new("en-US-GuyNeural", "English male (Guy)"),
            ],
        }
    }
}

impl VoiceCatalog {
    pub fn new(voices: Vec<VoiceProfile>) -> Self {
        Self { voices }
    }

    /// Load a catalog from a TOML file with a top-level `voices` array.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let catalog: VoiceCatalog =
            toml::from_str(raw).map_err(|e| Error::VoiceCatalog(e.to_string()))?;
        if catalog.voices.is_empty() {
            return Err(Error::VoiceCatalog("catalog contains no voices".into()));
        }
        Ok(catalog)
    }

    pub fn voices(&self) -> &[VoiceProfile] {
        &self.voices
    }

    pub fn get(&self, code: &str) -> Option<&VoiceProfile> {
        self.voices.iter().find(|v| v.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
