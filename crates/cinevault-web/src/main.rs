//! Cinevault server.
//!
//! Startup order: environment, tracing, config, database, an optional
//! startup ingest, then the HTTP listener. A missing TMDB key downgrades
//! the startup ingest to a warning; the catalog still serves whatever it
//! already holds.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cinevault_db::Database;
use cinevault_ingestion::pacing::{Sleeper, TokioSleeper};
use cinevault_ingestion::pipeline::run_ingest;
use cinevault_ingestion::store::IngestStore;
use cinevault_ingestion::tmdb::{MovieSource, TmdbClient};

use cinevault_web::config::Config;
use cinevault_web::router::build_router;
use cinevault_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    info!(database = %config.database.url, "starting cinevault");

    let db = Database::connect(&config.database.url, config.database.max_connections).await?;
    db.migrate().await?;

    if config.ingest.run_on_startup {
        match config.tmdb.api_key() {
            Some(api_key) => {
                info!(target = config.ingest.target_count, "running startup ingest");
                let source: Arc<dyn MovieSource> =
                    Arc::new(TmdbClient::new(config.tmdb.client_config(), api_key));
                let store = IngestStore::new(db.clone());
                let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
                let report =
                    run_ingest(config.ingest.job(), source, store, sleeper, None).await;
                info!(
                    saved = report.movies_saved,
                    failed = report.movies_failed,
                    pages = report.pages_scanned,
                    duration_ms = report.duration_ms,
                    "startup ingest finished"
                );
            }
            None => warn!(
                variable = %config.tmdb.api_key_env,
                "TMDB API key not set, skipping startup ingest"
            ),
        }
    }

    let state = AppState::new(db, config.clone());
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
