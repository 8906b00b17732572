//! Narration endpoints
//!
//! One pipeline invocation per request; requests are independent and
//! share no mutable state.

use axum::{extract::State, Json};
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use sauti_core::{NarrationRequest, VoiceProfile};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NarrateRequest {
    pub script: String,
    pub voice: String,
    #[serde(default)]
    pub speed_percent: i32,
    #[serde(default = "default_pause_seconds")]
    pub pause_seconds: f64,
    /// Optional compressed background track, base64-encoded.
    #[serde(default)]
    pub bgm_base64: Option<String>,
}

fn default_pause_seconds() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct NarrateResponse {
    pub audio_base64: String,
    pub sample_rate: u32,
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceProfile>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.narrator.catalog().voices().to_vec(),
    })
}

pub async fn narrate(
    State(state): State<AppState>,
    Json(req): Json<NarrateRequest>,
) -> Result<Json<NarrateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "narrate request {}: {} chars, voice={}",
        request_id,
        req.script.len(),
        req.voice
    );

    if !state.narrator.catalog().contains(&req.voice) {
        return Err(ApiError::bad_request(format!(
            "unknown voice code: {}",
            req.voice
        )));
    }

    let engine = base64::engine::general_purpose::STANDARD;
    let bgm = match &req.bgm_base64 {
        Some(encoded) => Some(Bytes::from(engine.decode(encoded).map_err(|e| {
            ApiError::bad_request(format!("invalid bgm_base64: {}", e))
        })?)),
        None => None,
    };

    let request = NarrationRequest {
        script: req.script,
        voice_code: req.voice,
        speed_percent: req.speed_percent,
        pause_seconds: req.pause_seconds,
        bgm,
    };

    let buffer = state.narrator.narrate(&request).await?;
    info!("narrate request {} complete: {} bytes", request_id, buffer.len());

    Ok(Json(NarrateResponse {
        audio_base64: engine.encode(&buffer),
        sample_rate: state.narrator.config().sample_rate,
        format: "wav".to_string(),
    }))
}
