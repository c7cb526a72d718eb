mod bootstrap;
mod chat;
mod health;

use std::sync::Arc;

use anyhow::Result;
use switchboard_agent::llm::HttpLlmClient;
use switchboard_agent::retrieval::StaticRetriever;
use switchboard_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use switchboard_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let llm = Arc::new(HttpLlmClient::from_config(&app.config.llm)?);
    let state = chat::ChatState {
        registry: app.registry.clone(),
        warnings: app.warnings.clone(),
        gate: app.gate,
        platforms: app.config.platforms.clone(),
        chat: app.config.chat.clone(),
        llm,
        retriever: Arc::new(StaticRetriever::default()),
        backend_override: None,
    };

    let router = chat::router(state).merge(health::router(app.gate));
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        functions = app.registry.len(),
        "switchboard-server started"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "switchboard-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
