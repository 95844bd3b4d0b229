mod auth;
mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenVerifier;
use crate::config::{Config, ResumeStorage};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::resumes::files::{FileStore, LocalDiskStore, S3FileStore};
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;
use crate::store::postgres::{PgInterviewStore, PgResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Résumé file storage
    let files: Arc<dyn FileStore> = match &config.resume_storage {
        ResumeStorage::Local { upload_dir } => Arc::new(LocalDiskStore::open(upload_dir.clone()).await?),
        ResumeStorage::S3(settings) => Arc::new(S3FileStore::connect(settings).await),
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        interviews: Arc::new(PgInterviewStore::new(db.clone())),
        resumes: Arc::new(PgResumeStore::new(db)),
        files,
        chat: Arc::new(llm),
        tokens: TokenVerifier::new(&config.jwt_secret),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.cors_allow_localhost));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
