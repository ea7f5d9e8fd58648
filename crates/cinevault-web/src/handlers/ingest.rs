//! Ingest trigger endpoint.
//!
//! Kicks off a bounded ingest run in the background and returns 202
//! immediately; progress flows to clients over the SSE channel.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::info;

use cinevault_common::ApiError;
use cinevault_ingestion::pacing::{Sleeper, TokioSleeper};
use cinevault_ingestion::pipeline::{run_ingest, IngestProgress};
use cinevault_ingestion::store::IngestStore;
use cinevault_ingestion::tmdb::{MovieSource, TmdbClient};

use crate::state::{AppEvent, SharedState};

#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    pub target_count: Option<usize>,
    pub max_pages: Option<u32>,
}

pub async fn run(
    State(state): State<SharedState>,
    request: Option<Json<RunRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let settings = &state.config.tmdb;
    let Some(api_key) = settings.api_key() else {
        return Err(ApiError::BadRequest(format!(
            "{} is not set; cannot reach TMDB",
            settings.api_key_env
        )));
    };

    let mut job = state.config.ingest.job();
    if let Some(count) = request.target_count {
        job.target_count = count;
    }
    if let Some(pages) = request.max_pages {
        job.max_pages = pages;
    }
    let target_count = job.target_count;

    let source: Arc<dyn MovieSource> =
        Arc::new(TmdbClient::new(settings.client_config(), api_key));
    let store = IngestStore::new(state.db.clone());
    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);

    // bridge pipeline progress onto the app event channel
    let (progress_tx, mut progress_rx) = broadcast::channel::<IngestProgress>(64);
    let event_tx = state.event_tx.clone();
    tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            let _ = event_tx.send(AppEvent::IngestStatus {
                stage: progress.stage,
                message: progress.message,
                saved: progress.saved,
                target: progress.target,
            });
        }
    });

    let event_tx = state.event_tx.clone();
    tokio::spawn(async move {
        let report = run_ingest(job, source, store, sleeper, Some(progress_tx)).await;
        let _ = event_tx.send(AppEvent::Notification {
            level: "info".to_string(),
            message: format!(
                "ingest finished: {} saved, {} failed, {} pages scanned",
                report.movies_saved, report.movies_failed, report.pages_scanned
            ),
        });
    });

    info!(target_count, "ingest run accepted");
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "started", "target_count": target_count })),
    ))
}
