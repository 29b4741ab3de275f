mod config;
mod errors;
mod occupations;
mod onet_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::occupations::pipeline::Pipeline;
use crate::occupations::store::RecordStore;
use crate::onet_client::{Endpoints, OnetClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Occupations API v{}", env!("CARGO_PKG_VERSION"));

    // Credentials are handed over once; the client never re-reads the environment
    let client = OnetClient::new(config.credentials.clone())?;
    info!(
        "Occupation service client initialized (base: {}, user: {})",
        config.base_url, config.credentials.username
    );

    let store = RecordStore::new(config.output_dir.clone());
    info!("Record store: {}", store.dir().display());

    let pipeline = Pipeline::new(
        Arc::new(client),
        Endpoints::new(config.base_url.clone()),
        store,
        config.report_detail_fetch_failures,
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
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
