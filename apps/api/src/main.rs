mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::Orchestrator;
use crate::analysis::prompts::PromptTable;
use crate::config::{Config, GeneratorBackend};
use crate::llm_client::{Generator, OllamaHttpGenerator, ProcessGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reasoning Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Load system prompts once; immutable for the life of the process
    let prompts = Arc::new(PromptTable::load(&config.prompts_dir));

    // Initialize generator backend
    let generator = build_generator(&config)?;
    info!(
        "Generator initialized (backend: {:?}, model: {}, timeout: {}s)",
        config.generator_backend,
        generator.model(),
        config.generation_timeout.as_secs()
    );

    let state = AppState {
        orchestrator: Orchestrator::new(prompts, generator),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the configured `Generator`: a process per call, or the Ollama HTTP API.
fn build_generator(config: &Config) -> Result<Arc<dyn Generator>> {
    let generator: Arc<dyn Generator> = match config.generator_backend {
        GeneratorBackend::Process => {
            let mut process = ProcessGenerator::new(&config.generator_bin, &config.model_name)
                .with_timeout(config.generation_timeout)
                .with_max_concurrent(config.max_concurrent_generations);
            if let Some(args) = &config.generator_args {
                process = process.with_args(args.clone());
            }
            Arc::new(process)
        }
        GeneratorBackend::Http => Arc::new(OllamaHttpGenerator::new(
            &config.ollama_url,
            &config.model_name,
            config.generation_timeout,
        )?),
    };
    Ok(generator)
}
