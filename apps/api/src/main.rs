use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::config::{Config, StoreBackend};
use api::db::create_pool;
use api::routes::build_router;
use api::state::AppState;
use api::store::memory::MemoryStore;
use api::store::postgres::{PgApplicationStore, PgCandidateStore, PgPositionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentFlow API v{}", env!("CARGO_PKG_VERSION"));

    let state = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .clone()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = create_pool(&database_url).await?;
            AppState::new(
                Arc::new(PgPositionStore::new(pool.clone())),
                Arc::new(PgApplicationStore::new(pool.clone())),
                Arc::new(PgCandidateStore::new(pool)),
            )
        }
        StoreBackend::Memory => {
            info!("Using seeded in-memory store (no database)");
            let store = Arc::new(MemoryStore::with_seed_data());
            AppState::new(store.clone(), store.clone(), store)
        }
    };

    // Permissive CORS: the board frontend is served from its own origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
