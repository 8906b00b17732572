//! Sauti Server - HTTP API for the narration pipeline

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod settings;
mod state;

use sauti_core::{HttpSpeechBackend, Narrator, VoiceCatalog};
use settings::Settings;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sauti_server=debug,sauti_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sauti narration server");

    let settings = Settings::load()?;
    info!("Speech backend endpoint: {}", settings.tts_endpoint);

    let catalog = match &settings.voices_file {
        Some(path) => VoiceCatalog::from_toml_file(std::path::Path::new(path))?,
        None => VoiceCatalog::default(),
    };
    info!("Voice catalog: {} voices", catalog.voices().len());

    let backend = Arc::new(HttpSpeechBackend::new(settings.tts_endpoint.clone()));
    let narrator = Narrator::new(settings.pipeline.clone(), catalog, backend);
    let app_state = AppState::new(narrator);

    let app = api::create_router(app_state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
