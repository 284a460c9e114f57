mod config;
mod jokes;
mod llm;
mod reminders;
mod router;
mod server;
mod weather;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::llm::GenerationClient;
use crate::reminders::ReminderStore;
use crate::router::ChatRouter;
use crate::server::AppState;
use crate::weather::OpenWeatherClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,aitwin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Dialogue model: {}", config.generation.dialogue_model);
    info!("  Poem model: {}", config.generation.poem_model);
    info!("  Reminders table: {}", config.supabase.table);

    // Construct collaborators; the router receives them by injection.
    let weather = Arc::new(OpenWeatherClient::new(config.weather.clone()));
    let poem = Arc::new(GenerationClient::new(
        &config.generation,
        config.generation.poem_model.clone(),
    ));
    let dialogue = Arc::new(GenerationClient::new(
        &config.generation,
        config.generation.dialogue_model.clone(),
    ));
    let chat_router = ChatRouter::new(poem, dialogue, weather.clone());

    let state = Arc::new(AppState {
        router: chat_router,
        qa: GenerationClient::new(&config.generation, config.generation.qa_model.clone()),
        summarizer: GenerationClient::new(&config.generation, config.generation.summary_model.clone()),
        weather,
        reminders: ReminderStore::new(config.supabase.clone()),
    });

    let addr = config.listen_addr();
    info!("API server is starting on http://{}", addr);
    server::run(state, &addr).await
}
