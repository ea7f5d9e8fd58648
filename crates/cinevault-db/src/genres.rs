//! Genre repository.

use std::collections::HashSet;

use cinevault_common::Result;

use crate::database::Database;
use crate::schema::Genre;

pub struct GenreRepository {
    db: Database,
}

impl GenreRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert every genre not already present, keeping existing rows as
    /// they are. Returns the number of newly inserted genres.
    pub async fn insert_missing(&self, genres: &[Genre]) -> Result<usize> {
        let mut inserted = 0usize;
        for genre in genres {
            let affected =
                sqlx::query("INSERT OR IGNORE INTO genres (id, name) VALUES ($1, $2)")
                    .bind(genre.id)
                    .bind(&genre.name)
                    .execute(self.db.pool())
                    .await?
                    .rows_affected();
            inserted += affected as usize;
        }
        Ok(inserted)
    }

    pub async fn all(&self) -> Result<Vec<Genre>> {
        let genres: Vec<Genre> = sqlx::query_as("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(self.db.pool())
            .await?;
        Ok(genres)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Genre>> {
        let genre: Option<Genre> = sqlx::query_as("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(genre)
    }

    /// The full set of known genre ids, used to resolve incoming references.
    pub async fn ids(&self) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM genres")
            .fetch_all(self.db.pool())
            .await?;
        Ok(ids.into_iter().collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}
