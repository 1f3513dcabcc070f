mod analysis;
mod config;
mod errors;
mod extraction;
mod models;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::MockAnalyzer;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::storage::{FileStorage, MemoryStorage, Storage};
use crate::session::{AnalysisController, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Guard API v{}", env!("CARGO_PKG_VERSION"));

    // Durable history lives in DATA_DIR; a corrupt file just means empty history.
    let storage: Arc<dyn Storage> = if config.persist_history {
        info!("History storage at {}", config.data_dir.display());
        Arc::new(FileStorage::new(&config.data_dir))
    } else {
        info!("History storage is in-memory only");
        Arc::new(MemoryStorage::new())
    };
    let store = SessionStore::load(storage, config.history_limit).await;
    info!("History limit: {:?}", config.history_limit);

    let analyzer = Arc::new(MockAnalyzer::new(
        config.rng_seed,
        config.analysis_delay,
        config.humanize_delay,
    ));
    info!(
        "Mock analyzer ready (analysis {:?}, humanize {:?}, seeded: {})",
        config.analysis_delay,
        config.humanize_delay,
        config.rng_seed.is_some()
    );

    let state = AppState {
        controller: Arc::new(AnalysisController::new(analyzer, store)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
