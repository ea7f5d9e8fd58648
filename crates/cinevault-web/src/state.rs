//! Shared application state for the web server.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use cinevault_db::Database;

use crate::config::Config;

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// Ingest pipeline progress.
    IngestStatus {
        stage: String,
        message: String,
        saved: usize,
        target: usize,
    },
    /// General notification.
    Notification { level: String, message: String },
}

pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self { db, config, event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }
}

pub type SharedState = Arc<AppState>;
