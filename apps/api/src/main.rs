mod config;
mod errors;
mod intake;
mod llm_client;
mod presenter;
mod prompt;
mod routes;
mod session;
mod state;
mod workflow;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::prompt::ruleset::Ruleset;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (refuses to start without OPENAI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting COI intake API v{}", env!("CARGO_PKG_VERSION"));

    // Load the ruleset (bundled unless RULESET_PATH overrides it)
    let ruleset = Ruleset::load(config.ruleset_path.as_deref())?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
        config.generation_timeout_secs.map(Duration::from_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, max_output_tokens: strategy={} lookup={})",
        llm.model(),
        config.limits.strategy,
        config.limits.lookup
    );

    // Build app state
    let state = AppState {
        generator: Arc::new(llm),
        sessions: Arc::new(SessionStore::new()),
        ruleset: Arc::new(ruleset),
        limits: config.limits,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
