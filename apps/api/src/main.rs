mod config;
mod errors;
mod extract;
mod janitor;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::extract::PdfExtractor;
use crate::jobs::{JobBoard, JobPosting};
use crate::llm_client::{ChatModel, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::CandidateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting résumé screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_settings())?;
    info!("LLM client initialized (model: {})", llm.model_id());

    let extractor = PdfExtractor::new(config.max_upload_bytes);

    // Storage: candidates JSON file and job postings CSV
    let store = CandidateStore::new(&config.candidates_path);
    let jobs = JobBoard::new(&config.jobs_path);
    if jobs.seed(&JobPosting::default_posting()).await? {
        info!("Seeded default job posting into {}", jobs.path().display());
    }
    info!(
        "Candidates stored in {}, uploads staged in {}",
        store.path().display(),
        config.upload_dir.display()
    );

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    janitor::spawn_upload_sweeper(
        config.upload_dir.clone(),
        janitor::STALE_UPLOAD_AGE,
        janitor::SWEEP_INTERVAL,
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        extractor: Arc::new(extractor),
        store,
        jobs,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
