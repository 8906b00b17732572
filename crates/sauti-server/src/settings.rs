//! Server settings
//!
//! Layered from an optional `sauti.toml` next to the binary and `SAUTI_*`
//! environment variables (e.g. `SAUTI_PORT=9090`).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Synthesis route of the speech service.
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    /// Optional TOML voice catalog; the built-in catalog is used when unset.
    #[serde(default)]
    pub voices_file: Option<String>,

    #[serde(default)]
    pub pipeline: sauti_core::PipelineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tts_endpoint: default_tts_endpoint(),
            voices_file: None,
            pipeline: sauti_core::PipelineConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_tts_endpoint() -> String {
    "http://127.0.0.1:5002/api/synthesize".to_string()
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("sauti").required(false))
            .add_source(config::Environment::with_prefix("SAUTI"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
