//! Duplicate gating for ingested movies.
//!
//! Identity is the upstream id. The gate consults the ids accepted earlier
//! in this run before touching the store, and runs before any detail
//! request is paid for.

use std::collections::HashSet;

use anyhow::Result;

use crate::store::IngestStore;

#[derive(Debug, Default)]
pub struct Deduplicator {
    accepted: HashSet<i64>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the id was neither accepted this run nor persisted before.
    pub async fn is_new(&self, store: &IngestStore, tmdb_id: i64) -> Result<bool> {
        if self.accepted.contains(&tmdb_id) {
            return Ok(false);
        }
        Ok(!store.movie_exists(tmdb_id).await?)
    }

    /// Record an id accepted during this run.
    pub fn mark_accepted(&mut self, tmdb_id: i64) {
        self.accepted.insert(tmdb_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinevault_db::Database;

    #[tokio::test]
    async fn gate_checks_run_set_then_store() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let store = IngestStore::new(db);

        let mut dedup = Deduplicator::new();
        assert!(dedup.is_new(&store, 42).await.unwrap());

        dedup.mark_accepted(42);
        assert!(!dedup.is_new(&store, 42).await.unwrap());
        assert!(dedup.is_new(&store, 43).await.unwrap());

        let movie = cinevault_db::schema::NewMovie {
            tmdb_id: 43,
            title: "Persisted".into(),
            ..Default::default()
        };
        store.save_movie(&movie).await.unwrap();
        assert!(!dedup.is_new(&store, 43).await.unwrap());
    }
}
