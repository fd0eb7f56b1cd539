mod applications;
mod auth;
mod chat;
mod config;
mod db;
mod errors;
mod hr;
mod interview;
mod jobs;
mod llm_client;
mod models;
mod notifications;
mod profile;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, reset_stuck_processing, run_migrations};
use crate::jobs::JobCatalog;
use crate::llm_client::LlmClient;
use crate::resume::ResumeQueue;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("kanso_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting KansoAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;
    reset_stuck_processing(&db).await?;

    // Initialize LLM client (disabled without GOOGLE_API_KEY)
    let llm = LlmClient::from_api_key(config.google_api_key.as_deref())
        .context("Failed to initialize LLM client")?;

    let catalog = JobCatalog::load(&config.jobs_file)?;
    let resume_queue = ResumeQueue::start(db.clone(), llm.clone());

    // Build app state
    let state = AppState {
        db,
        llm,
        config: config.clone(),
        catalog,
        resume_queue,
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("CORS_ORIGIN must be a valid origin")?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
