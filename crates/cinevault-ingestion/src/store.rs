//! Store facade consumed by the pipeline: the handful of persisted-state
//! operations an ingest run needs, over the shared database handle.

use std::collections::HashSet;

use anyhow::{Context, Result};

use cinevault_db::schema::{Genre, NewMovie};
use cinevault_db::{Database, GenreRepository, MovieRepository};

#[derive(Clone)]
pub struct IngestStore {
    db: Database,
}

impl IngestStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn movie_exists(&self, tmdb_id: i64) -> Result<bool> {
        MovieRepository::new(self.db.clone())
            .exists_by_tmdb_id(tmdb_id)
            .await
            .context("movie existence check failed")
    }

    /// Insert the genres not present yet; returns how many were new.
    pub async fn seed_genres(&self, genres: &[Genre]) -> Result<usize> {
        GenreRepository::new(self.db.clone())
            .insert_missing(genres)
            .await
            .context("genre seeding failed")
    }

    /// The id vocabulary incoming genre references are resolved against.
    pub async fn known_genre_ids(&self) -> Result<HashSet<i64>> {
        GenreRepository::new(self.db.clone())
            .ids()
            .await
            .context("failed to load genre ids")
    }

    /// One transaction: movie row, company find-or-create plus edges, genre
    /// edges, cast rows.
    pub async fn save_movie(&self, movie: &NewMovie) -> Result<i64> {
        MovieRepository::new(self.db.clone())
            .insert_with_relations(movie)
            .await
            .with_context(|| format!("failed to save movie {}", movie.tmdb_id))
    }

    pub async fn movie_count(&self) -> Result<i64> {
        MovieRepository::new(self.db.clone())
            .count()
            .await
            .context("movie count failed")
    }
}
