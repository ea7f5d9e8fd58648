//! Database connection and schema management.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Schema DDL, one statement per entry. sqlx prepares a single statement
/// per query, so these must not be joined. The UNIQUE constraint on
/// `movies.tmdb_id` doubles as its lookup index.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tmdb_id INTEGER NOT NULL UNIQUE,
        title TEXT NOT NULL,
        overview TEXT,
        poster_path TEXT,
        backdrop_path TEXT,
        vote_average REAL NOT NULL DEFAULT 0,
        vote_count INTEGER NOT NULL DEFAULT 0,
        release_date TEXT,
        runtime INTEGER,
        status TEXT,
        popularity REAL NOT NULL DEFAULT 0,
        original_language TEXT,
        original_title TEXT,
        adult INTEGER NOT NULL DEFAULT 0,
        trailer_key TEXT,
        keywords TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS production_companies (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        logo_path TEXT,
        origin_country TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movie_genres (
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
        PRIMARY KEY (movie_id, genre_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movie_companies (
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        company_id INTEGER NOT NULL REFERENCES production_companies(id) ON DELETE CASCADE,
        PRIMARY KEY (movie_id, company_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cast_members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        tmdb_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        character TEXT,
        profile_path TEXT,
        credit_order INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_movies_title ON movies(title)",
    "CREATE INDEX IF NOT EXISTS idx_movies_release_date ON movies(release_date)",
    "CREATE INDEX IF NOT EXISTS idx_movies_popularity ON movies(popularity)",
    "CREATE INDEX IF NOT EXISTS idx_movie_genres_genre ON movie_genres(genre_id)",
    "CREATE INDEX IF NOT EXISTS idx_movie_companies_company ON movie_companies(company_id)",
    "CREATE INDEX IF NOT EXISTS idx_cast_members_movie ON cast_members(movie_id)",
];

/// Cloneable handle to the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a SQLite database, creating the file (and its parent directory)
    /// if missing. Foreign keys are enforced on every connection.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        if let Some(path) = file_path(database_url) {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to {database_url}"))?;

        info!(url = database_url, "database connected");
        Ok(Self { pool })
    }

    /// In-memory database on a single connection, for tests. More than one
    /// pooled connection would each see its own empty database.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory url")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("failed to open in-memory database")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables and indexes if missing. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("schema migration failed")?;
        }
        info!("database schema ready");
        Ok(())
    }
}

/// Filesystem path behind a sqlite url, `None` for in-memory databases.
fn file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    if rest.starts_with(":memory:") || rest.contains("mode=memory") {
        None
    } else {
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_strips_scheme() {
        assert_eq!(file_path("sqlite://data/cinevault.db"), Some("data/cinevault.db"));
        assert_eq!(file_path("sqlite:cinevault.db"), Some("cinevault.db"));
        assert_eq!(file_path("sqlite::memory:"), None);
        assert_eq!(file_path("postgres://nope"), None);
    }

    #[tokio::test]
    async fn connect_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("test.db");
        let url = format!("sqlite://{}", db_path.display());

        let db = Database::connect(&url, 2).await.unwrap();
        db.migrate().await.unwrap();
        // re-running the migration must be a no-op
        db.migrate().await.unwrap();

        assert!(db_path.exists());

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        for expected in [
            "movies",
            "genres",
            "production_companies",
            "movie_genres",
            "movie_companies",
            "cast_members",
        ] {
            assert!(names.contains(&expected), "missing table {expected}");
        }
    }
}
