//! One-shot bounded ingest run.
//!
//! A run seeds the genre vocabulary, then walks popularity-ordered pages
//! up to a page ceiling, gating each summary (already present? adult?)
//! before paying for its detail request, and saving each accepted movie
//! atomically with all relationships.
//!
//! The run is strictly sequential: the upstream API is rate limited, so
//! one request is in flight at a time, with enforced delays between items
//! and pages. Consecutive item failures escalate to a cooldown pause.
//!
//! Nothing in here aborts the run. Item failures are logged, counted and
//! carried in the report; the worst outcome is fewer movies than asked
//! for, which the report flags as falling short of target.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use cinevault_db::schema::Genre;

use crate::assemble::assemble_movie;
use crate::dedup::Deduplicator;
use crate::pacing::{FailureTracker, Sleeper};
use crate::store::IngestStore;
use crate::tmdb::MovieSource;

// ── Job parameters ───────────────────────────────────────────────────────────

/// Parameters for a single ingest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestJob {
    /// Stop once this many new movies have been accepted.
    pub target_count: usize,
    /// Hard ceiling on pages scanned, reached target or not.
    pub max_pages: u32,
    /// Pause before each detail request.
    pub item_delay_ms: u64,
    /// Pause between pages while below target.
    pub page_delay_ms: u64,
    /// Consecutive item failures that trigger a cooldown.
    pub failure_threshold: u32,
    pub cooldown_ms: u64,
}

impl Default for IngestJob {
    fn default() -> Self {
        Self {
            target_count: 100,
            max_pages: 20,
            item_delay_ms: 300,
            page_delay_ms: 1000,
            failure_threshold: 3,
            cooldown_ms: 5000,
        }
    }
}

// ── Progress events ──────────────────────────────────────────────────────────

/// Progress event emitted during a run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestProgress {
    pub job_id: Uuid,
    pub stage: String,
    pub message: String,
    pub saved: usize,
    pub target: usize,
}

// ── Run report ───────────────────────────────────────────────────────────────

/// Summary of a finished run. A run that fell short of target is still a
/// successful run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub job_id: Uuid,
    pub genres_seeded: usize,
    pub pages_scanned: u32,
    pub movies_saved: usize,
    pub skipped_existing: usize,
    pub skipped_adult: usize,
    pub movies_failed: usize,
    pub reached_target: bool,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

/// Run one bounded ingest against `source`, persisting through `store`.
#[instrument(skip_all, fields(target = job.target_count, max_pages = job.max_pages))]
pub async fn run_ingest(
    job: IngestJob,
    source: Arc<dyn MovieSource>,
    store: IngestStore,
    sleeper: Arc<dyn Sleeper>,
    progress_tx: Option<broadcast::Sender<IngestProgress>>,
) -> IngestReport {
    let job_id = Uuid::new_v4();
    let started = Instant::now();
    info!(job_id = %job_id, "starting ingest run");

    let mut report = IngestReport {
        job_id,
        genres_seeded: 0,
        pages_scanned: 0,
        movies_saved: 0,
        skipped_existing: 0,
        skipped_adult: 0,
        movies_failed: 0,
        reached_target: false,
        errors: Vec::new(),
        duration_ms: 0,
    };

    let emit = |stage: &str, message: String, saved: usize| {
        if let Some(tx) = &progress_tx {
            let _ = tx.send(IngestProgress {
                job_id,
                stage: stage.to_string(),
                message,
                saved,
                target: job.target_count,
            });
        }
    };

    // Genre seeding. An empty or failed fetch is non-fatal: the run keeps
    // going and movies simply resolve fewer genre associations.
    let remote_genres = source.fetch_genres().await;
    if remote_genres.is_empty() {
        warn!("no genres fetched; genre references will not resolve this run");
    } else {
        let seed: Vec<Genre> = remote_genres
            .iter()
            .map(|g| Genre { id: g.id, name: g.name.clone() })
            .collect();
        match store.seed_genres(&seed).await {
            Ok(new) => {
                report.genres_seeded = new;
                info!(fetched = seed.len(), new, "genres seeded");
            }
            Err(e) => {
                let msg = format!("genre seeding failed: {e:#}");
                warn!("{msg}");
                report.errors.push(msg);
            }
        }
    }

    let known_genres: HashSet<i64> = match store.known_genre_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            let msg = format!("failed to load genre vocabulary: {e:#}");
            warn!("{msg}");
            report.errors.push(msg);
            HashSet::new()
        }
    };
    emit("seeded", format!("{} genres known", known_genres.len()), 0);

    let item_delay = Duration::from_millis(job.item_delay_ms);
    let page_delay = Duration::from_millis(job.page_delay_ms);
    let mut tracker = FailureTracker::new(job.failure_threshold, Duration::from_millis(job.cooldown_ms));
    let mut dedup = Deduplicator::new();

    let mut page: u32 = 1;
    while report.movies_saved < job.target_count && page <= job.max_pages {
        let summaries = source.fetch_popular_page(page).await;
        report.pages_scanned = page;
        if summaries.is_empty() {
            info!(page, "empty page, ending run early");
            break;
        }
        emit(
            "page",
            format!("page {page}: {} summaries", summaries.len()),
            report.movies_saved,
        );

        for summary in summaries {
            if report.movies_saved >= job.target_count {
                break;
            }

            // cheapest gate first: no detail request for known movies
            match dedup.is_new(&store, summary.id).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(tmdb_id = summary.id, title = %summary.title, "already in catalog, skipping");
                    report.skipped_existing += 1;
                    continue;
                }
                Err(e) => {
                    let msg = format!("existence check failed for {} ({}): {e:#}", summary.title, summary.id);
                    warn!("{msg}");
                    report.errors.push(msg);
                    report.movies_failed += 1;
                    serve_cooldown(&mut tracker, &*sleeper).await;
                    continue;
                }
            }

            if summary.adult {
                info!(tmdb_id = summary.id, title = %summary.title, "adult content, skipping");
                report.skipped_adult += 1;
                continue;
            }

            // pacing ahead of the paid call
            sleeper.sleep(item_delay).await;

            let details = match source.fetch_movie_details(summary.id).await {
                Some(details) => details,
                None => {
                    warn!(tmdb_id = summary.id, title = %summary.title, "detail fetch failed, skipping");
                    report.errors.push(format!(
                        "detail fetch failed for {} ({})",
                        summary.title, summary.id
                    ));
                    report.movies_failed += 1;
                    serve_cooldown(&mut tracker, &*sleeper).await;
                    continue;
                }
            };

            let assembled = assemble_movie(&details, &known_genres);
            match store.save_movie(&assembled).await {
                Ok(movie_id) => {
                    tracker.record_success();
                    dedup.mark_accepted(details.id);
                    report.movies_saved += 1;
                    info!(
                        movie_id,
                        tmdb_id = details.id,
                        title = %details.title,
                        saved = report.movies_saved,
                        target = job.target_count,
                        "movie saved"
                    );
                    emit(
                        "saved",
                        format!("{} ({}/{})", details.title, report.movies_saved, job.target_count),
                        report.movies_saved,
                    );
                }
                Err(e) => {
                    let msg = format!("save failed for {} ({}): {e:#}", details.title, details.id);
                    warn!("{msg}");
                    report.errors.push(msg);
                    report.movies_failed += 1;
                    serve_cooldown(&mut tracker, &*sleeper).await;
                }
            }
        }

        page += 1;
        if report.movies_saved < job.target_count && page <= job.max_pages {
            sleeper.sleep(page_delay).await;
        }
    }

    report.reached_target = report.movies_saved >= job.target_count;
    report.duration_ms = started.elapsed().as_millis() as u64;

    let total_in_store = store.movie_count().await.unwrap_or(0);
    info!(
        job_id = %job_id,
        saved = report.movies_saved,
        skipped_existing = report.skipped_existing,
        skipped_adult = report.skipped_adult,
        failed = report.movies_failed,
        pages = report.pages_scanned,
        total_in_store,
        duration_ms = report.duration_ms,
        "ingest run complete"
    );
    if !report.reached_target {
        warn!(
            saved = report.movies_saved,
            target = job.target_count,
            "run ended below target; pages ran out or upstream kept failing"
        );
    }
    emit(
        "complete",
        format!("{}/{} movies saved", report.movies_saved, job.target_count),
        report.movies_saved,
    );

    report
}

/// Record an item failure and serve the cooldown if the streak hit the
/// threshold.
async fn serve_cooldown(tracker: &mut FailureTracker, sleeper: &dyn Sleeper) {
    if let Some(cooldown) = tracker.record_failure() {
        warn!(
            cooldown_ms = cooldown.as_millis() as u64,
            "too many consecutive failures, cooling down"
        );
        sleeper.sleep(cooldown).await;
    }
}
