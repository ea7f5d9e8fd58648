//! End-to-end pipeline tests against a scripted source, a recording
//! sleeper and a real in-memory database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cinevault_db::{CompanyRepository, Database, GenreRepository, MovieRepository};
use cinevault_ingestion::models::{
    CastCreditDto, CompanyDto, CreditsDto, GenreDto, MovieDetails, MovieSummary, VideoDto,
    VideoList,
};
use cinevault_ingestion::pacing::Sleeper;
use cinevault_ingestion::pipeline::{run_ingest, IngestJob};
use cinevault_ingestion::store::IngestStore;
use cinevault_ingestion::tmdb::MovieSource;

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Source with pre-scripted pages and details. A movie id missing from
/// `details` behaves like an upstream detail failure.
struct ScriptedSource {
    genres: Vec<GenreDto>,
    pages: Vec<Vec<MovieSummary>>,
    details: HashMap<i64, MovieDetails>,
    detail_calls: Mutex<Vec<i64>>,
}

impl ScriptedSource {
    fn new(genres: Vec<GenreDto>, pages: Vec<Vec<MovieSummary>>, details: Vec<MovieDetails>) -> Self {
        Self {
            genres,
            pages,
            details: details.into_iter().map(|d| (d.id, d)).collect(),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    fn detail_calls(&self) -> Vec<i64> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieSource for ScriptedSource {
    async fn fetch_genres(&self) -> Vec<GenreDto> {
        self.genres.clone()
    }

    async fn fetch_popular_page(&self, page: u32) -> Vec<MovieSummary> {
        self.pages.get(page as usize - 1).cloned().unwrap_or_default()
    }

    async fn fetch_movie_details(&self, tmdb_id: i64) -> Option<MovieDetails> {
        self.detail_calls.lock().unwrap().push(tmdb_id);
        self.details.get(&tmdb_id).cloned()
    }
}

/// Captures every requested sleep instead of serving it.
#[derive(Default)]
struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn genre(id: i64, name: &str) -> GenreDto {
    GenreDto { id, name: name.to_string() }
}

fn summary(id: i64, title: &str) -> MovieSummary {
    MovieSummary { id, title: title.to_string(), adult: false, genre_ids: vec![28] }
}

fn details(id: i64, title: &str) -> MovieDetails {
    MovieDetails {
        id,
        title: title.to_string(),
        overview: Some("scripted".into()),
        poster_path: None,
        backdrop_path: None,
        vote_average: 7.0,
        vote_count: 100,
        release_date: Some("2020-01-01".into()),
        runtime: Some(100),
        status: Some("Released".into()),
        popularity: 10.0,
        original_language: Some("en".into()),
        original_title: Some(title.to_string()),
        adult: false,
        genres: Some(vec![genre(28, "Action")]),
        genre_ids: None,
        production_companies: vec![CompanyDto {
            id: 7,
            name: "Scripted Pictures".into(),
            logo_path: None,
            origin_country: Some("US".into()),
        }],
        videos: Some(VideoList {
            results: vec![VideoDto {
                key: format!("trailer-{id}"),
                site: "YouTube".into(),
                kind: "Trailer".into(),
                official: true,
                name: None,
            }],
        }),
        keywords: None,
        credits: Some(CreditsDto {
            cast: vec![CastCreditDto {
                id: id * 10,
                name: format!("Lead of {title}"),
                character: Some("Lead".into()),
                profile_path: None,
                order: 0,
            }],
            crew: Vec::new(),
        }),
    }
}

async fn store() -> (Database, IngestStore) {
    let db = Database::connect_in_memory().await.unwrap();
    db.migrate().await.unwrap();
    (db.clone(), IngestStore::new(db))
}

fn job() -> IngestJob {
    IngestJob::default()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn run_stops_at_target_and_seeds_genres() {
    let (db, store) = store().await;
    let source = Arc::new(ScriptedSource::new(
        vec![genre(28, "Action"), genre(18, "Drama")],
        vec![
            vec![summary(1, "One"), summary(2, "Two"), summary(3, "Three")],
            vec![summary(4, "Four"), summary(5, "Five")],
        ],
        (1..=5).map(|i| details(i, &format!("Movie {i}"))).collect(),
    ));
    let sleeper = Arc::new(RecordingSleeper::default());

    let mut job = job();
    job.target_count = 4;
    job.max_pages = 5;

    let report = run_ingest(job, source.clone(), store.clone(), sleeper.clone(), None).await;

    assert_eq!(report.movies_saved, 4);
    assert!(report.reached_target);
    assert_eq!(report.genres_seeded, 2);
    assert_eq!(report.pages_scanned, 2);
    assert!(report.errors.is_empty());

    // the fifth summary was never paid for
    assert_eq!(source.detail_calls(), vec![1, 2, 3, 4]);
    assert_eq!(store.movie_count().await.unwrap(), 4);
    assert_eq!(GenreRepository::new(db).count().await.unwrap(), 2);

    // one 300ms pause per detail request
    let item_pauses = sleeper
        .sleeps()
        .iter()
        .filter(|d| **d == Duration::from_millis(300))
        .count();
    assert_eq!(item_pauses, 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_run_rescans_without_writing() {
    let (_db, store) = store().await;
    let source = Arc::new(ScriptedSource::new(
        vec![genre(28, "Action")],
        vec![vec![summary(1, "One"), summary(2, "Two")]],
        vec![details(1, "One"), details(2, "Two")],
    ));
    let sleeper = Arc::new(RecordingSleeper::default());

    let first = run_ingest(job(), source.clone(), store.clone(), sleeper.clone(), None).await;
    assert_eq!(first.movies_saved, 2);
    let calls_after_first = source.detail_calls().len();

    let second = run_ingest(job(), source.clone(), store.clone(), sleeper.clone(), None).await;
    assert_eq!(second.movies_saved, 0);
    assert_eq!(second.skipped_existing, 2);
    assert!(second.errors.is_empty());

    // no detail requests and no new rows on the rescan
    assert_eq!(source.detail_calls().len(), calls_after_first);
    assert_eq!(store.movie_count().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn adult_summaries_are_never_paid_for() {
    let (_db, store) = store().await;
    let mut flagged = summary(66, "Flagged");
    flagged.adult = true;

    let source = Arc::new(ScriptedSource::new(
        vec![genre(28, "Action")],
        vec![vec![flagged, summary(2, "Fine")]],
        vec![details(2, "Fine")],
    ));
    let sleeper = Arc::new(RecordingSleeper::default());

    let report = run_ingest(job(), source.clone(), store.clone(), sleeper, None).await;

    assert_eq!(report.skipped_adult, 1);
    assert_eq!(report.movies_saved, 1);
    assert!(report.errors.is_empty());
    assert!(!source.detail_calls().contains(&66));
}

#[tokio::test(flavor = "multi_thread")]
async fn three_straight_failures_cool_down_once_then_continue() {
    let (_db, store) = store().await;
    // ids 1..3 have no scripted details and fail; 4 succeeds
    let source = Arc::new(ScriptedSource::new(
        vec![genre(28, "Action")],
        vec![vec![
            summary(1, "Bad 1"),
            summary(2, "Bad 2"),
            summary(3, "Bad 3"),
            summary(4, "Good"),
        ]],
        vec![details(4, "Good")],
    ));
    let sleeper = Arc::new(RecordingSleeper::default());

    let report = run_ingest(job(), source.clone(), store.clone(), sleeper.clone(), None).await;

    assert_eq!(report.movies_failed, 3);
    assert_eq!(report.movies_saved, 1);
    assert_eq!(report.errors.len(), 3);
    assert!(!report.reached_target);

    let cooldowns = sleeper
        .sleeps()
        .iter()
        .filter(|d| **d == Duration::from_millis(5000))
        .count();
    assert_eq!(cooldowns, 1, "threshold of 3 fires exactly one cooldown");
}

#[tokio::test(flavor = "multi_thread")]
async fn page_ceiling_bounds_the_run() {
    let (db, store) = store().await;

    let mut pages = Vec::new();
    let mut all_details = Vec::new();
    let mut next_id = 1i64;
    for _ in 0..5 {
        let mut page = Vec::new();
        for _ in 0..10 {
            page.push(summary(next_id, &format!("Movie {next_id}")));
            all_details.push(details(next_id, &format!("Movie {next_id}")));
            next_id += 1;
        }
        pages.push(page);
    }

    let source = Arc::new(ScriptedSource::new(vec![genre(28, "Action")], pages, all_details));
    let sleeper = Arc::new(RecordingSleeper::default());

    let mut job = job();
    job.target_count = 100;
    job.max_pages = 5;

    let report = run_ingest(job, source, store.clone(), sleeper, None).await;

    // 50 available under a target of 100: the ceiling ends the run cleanly
    assert_eq!(report.movies_saved, 50);
    assert_eq!(report.pages_scanned, 5);
    assert!(!report.reached_target);
    assert!(report.errors.is_empty());
    assert_eq!(store.movie_count().await.unwrap(), 50);

    // every movie shares one production company
    assert_eq!(CompanyRepository::new(db).count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_genre_references_do_not_fail_the_save() {
    let (db, store) = store().await;

    let mut d = details(9, "Oddball");
    d.genres = Some(vec![genre(28, "Action"), genre(999, "Made Up")]);

    let source = Arc::new(ScriptedSource::new(
        vec![genre(28, "Action")],
        vec![vec![summary(9, "Oddball")]],
        vec![d],
    ));
    let sleeper = Arc::new(RecordingSleeper::default());

    let report = run_ingest(job(), source, store, sleeper, None).await;
    assert_eq!(report.movies_saved, 1);
    assert!(report.errors.is_empty());

    let movies = MovieRepository::new(db);
    let saved = movies.find_by_tmdb_id(9).await.unwrap().unwrap();
    let detail = movies.find_detail(saved.id).await.unwrap().unwrap();
    let genre_ids: Vec<i64> = detail.genres.iter().map(|g| g.id).collect();
    assert_eq!(genre_ids, vec![28]);
    assert_eq!(detail.movie.trailer_key.as_deref(), Some("trailer-9"));
    assert_eq!(detail.cast.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_page_and_empty_genres_end_gracefully() {
    let (_db, store) = store().await;
    // no genres upstream; second page is empty
    let source = Arc::new(ScriptedSource::new(
        Vec::new(),
        vec![vec![summary(1, "Only One")], Vec::new()],
        vec![details(1, "Only One")],
    ));
    let sleeper = Arc::new(RecordingSleeper::default());

    let report = run_ingest(job(), source, store.clone(), sleeper, None).await;

    assert_eq!(report.movies_saved, 1);
    assert_eq!(report.genres_seeded, 0);
    assert_eq!(report.pages_scanned, 2);
    assert!(!report.reached_target);
    assert!(report.errors.is_empty());

    // saved despite the missing vocabulary, with no genre edges
    assert_eq!(store.movie_count().await.unwrap(), 1);
}
