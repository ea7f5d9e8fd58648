//! Movie repository.
//!
//! `insert_with_relations` is the write path used by ingestion: the movie
//! row, its company find-or-create plus join edges, genre edges and cast
//! rows all land in one transaction, so a movie is either fully present
//! with all relationships or absent.

use sqlx::FromRow;
use tracing::instrument;

use cinevault_common::Result;

use crate::database::Database;
use crate::schema::{CastMember, Genre, Movie, MovieDetail, MovieUpdate, NewMovie, ProductionCompany};

const MOVIE_COLUMNS: &str = "id, tmdb_id, title, overview, poster_path, backdrop_path, \
     vote_average, vote_count, release_date, runtime, status, popularity, \
     original_language, original_title, adult, trailer_key, keywords";

/// Raw movie row; `keywords` is stored as a JSON array in a TEXT column.
#[derive(FromRow)]
struct MovieRow {
    id: i64,
    tmdb_id: i64,
    title: String,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: f64,
    vote_count: i64,
    release_date: Option<chrono::NaiveDate>,
    runtime: Option<i64>,
    status: Option<String>,
    popularity: f64,
    original_language: Option<String>,
    original_title: Option<String>,
    adult: bool,
    trailer_key: Option<String>,
    keywords: String,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            overview: row.overview,
            poster_path: row.poster_path,
            backdrop_path: row.backdrop_path,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            release_date: row.release_date,
            runtime: row.runtime,
            status: row.status,
            popularity: row.popularity,
            original_language: row.original_language,
            original_title: row.original_title,
            adult: row.adult,
            trailer_key: row.trailer_key,
            keywords: serde_json::from_str(&row.keywords).unwrap_or_default(),
        }
    }
}

pub struct MovieRepository {
    db: Database,
}

impl MovieRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Save a movie and all of its relationships atomically.
    ///
    /// Companies are find-or-create by upstream id, so a company shared by
    /// many movies gets exactly one row. Genre edges are resolved against
    /// the genres table; ids not present there are dropped silently.
    #[instrument(skip(self, movie), fields(tmdb_id = movie.tmdb_id))]
    pub async fn insert_with_relations(&self, movie: &NewMovie) -> Result<i64> {
        let mut tx = self.db.pool().begin().await?;

        let keywords_json = serde_json::to_string(&movie.keywords)?;

        let movie_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO movies
                (tmdb_id, title, overview, poster_path, backdrop_path,
                 vote_average, vote_count, release_date, runtime, status,
                 popularity, original_language, original_title, adult,
                 trailer_key, keywords)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(movie.tmdb_id)
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(&movie.poster_path)
        .bind(&movie.backdrop_path)
        .bind(movie.vote_average)
        .bind(movie.vote_count)
        .bind(movie.release_date)
        .bind(movie.runtime)
        .bind(&movie.status)
        .bind(movie.popularity)
        .bind(&movie.original_language)
        .bind(&movie.original_title)
        .bind(movie.adult)
        .bind(&movie.trailer_key)
        .bind(keywords_json)
        .fetch_one(&mut *tx)
        .await?;

        for company in &movie.companies {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM production_companies WHERE id = $1)")
                    .bind(company.tmdb_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists {
                sqlx::query(
                    "INSERT INTO production_companies (id, name, logo_path, origin_country) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(company.tmdb_id)
                .bind(&company.name)
                .bind(&company.logo_path)
                .bind(&company.origin_country)
                .execute(&mut *tx)
                .await?;
            }
            sqlx::query(
                "INSERT OR IGNORE INTO movie_companies (movie_id, company_id) VALUES ($1, $2)",
            )
            .bind(movie_id)
            .bind(company.tmdb_id)
            .execute(&mut *tx)
            .await?;
        }

        for genre_id in &movie.genre_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO movie_genres (movie_id, genre_id) \
                 SELECT $1, id FROM genres WHERE id = $2",
            )
            .bind(movie_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        }

        for member in &movie.cast {
            sqlx::query(
                "INSERT INTO cast_members (movie_id, tmdb_id, name, character, profile_path, credit_order) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(movie_id)
            .bind(member.tmdb_id)
            .bind(&member.name)
            .bind(&member.character)
            .bind(&member.profile_path)
            .bind(member.credit_order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(movie_id)
    }

    /// Overwrite the movie's fields and replace its genre edges. Returns
    /// false when the id does not exist.
    pub async fn update(&self, id: i64, update: &MovieUpdate) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let keywords_json = serde_json::to_string(&update.keywords)?;

        let affected = sqlx::query(
            r#"
            UPDATE movies SET
                title = $1, overview = $2, poster_path = $3, backdrop_path = $4,
                vote_average = $5, vote_count = $6, release_date = $7, runtime = $8,
                status = $9, popularity = $10, original_language = $11,
                original_title = $12, adult = $13, trailer_key = $14, keywords = $15
            WHERE id = $16
            "#,
        )
        .bind(&update.title)
        .bind(&update.overview)
        .bind(&update.poster_path)
        .bind(&update.backdrop_path)
        .bind(update.vote_average)
        .bind(update.vote_count)
        .bind(update.release_date)
        .bind(update.runtime)
        .bind(&update.status)
        .bind(update.popularity)
        .bind(&update.original_language)
        .bind(&update.original_title)
        .bind(update.adult)
        .bind(&update.trailer_key)
        .bind(keywords_json)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for genre_id in &update.genre_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO movie_genres (movie_id, genre_id) \
                 SELECT $1, id FROM genres WHERE id = $2",
            )
            .bind(id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a movie; cast rows and join edges go with it via cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn exists_by_tmdb_id(&self, tmdb_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE tmdb_id = $1)")
                .bind(tmdb_id)
                .fetch_one(self.db.pool())
                .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// One page of movies. `sort_by` is matched against a whitelist of
    /// sortable columns; anything else falls back to id order.
    pub async fn list(&self, page: i64, size: i64, sort_by: &str, sort_direction: &str) -> Result<Vec<Movie>> {
        let column = match sort_by {
            "title" => "title",
            "release_date" => "release_date",
            "popularity" => "popularity",
            "vote_average" => "vote_average",
            _ => "id",
        };
        let direction = if sort_direction.eq_ignore_ascii_case("desc") {
            "DESC"
        } else {
            "ASC"
        };

        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY {column} {direction} LIMIT $1 OFFSET $2"
        );
        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(size)
            .bind(page * size)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        let row: Option<MovieRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(Movie::from))
    }

    pub async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE tmdb_id = $1");
        let row: Option<MovieRow> = sqlx::query_as(&sql)
            .bind(tmdb_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(Movie::from))
    }

    /// A movie with genres, companies and cast resolved. Cast comes back in
    /// ascending credit order.
    pub async fn find_detail(&self, id: i64) -> Result<Option<MovieDetail>> {
        let Some(movie) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let genres: Vec<Genre> = sqlx::query_as(
            "SELECT g.id, g.name FROM genres g \
             JOIN movie_genres mg ON mg.genre_id = g.id \
             WHERE mg.movie_id = $1 ORDER BY g.id",
        )
        .bind(id)
        .fetch_all(self.db.pool())
        .await?;

        let production_companies: Vec<ProductionCompany> = sqlx::query_as(
            "SELECT c.id, c.name, c.logo_path, c.origin_country FROM production_companies c \
             JOIN movie_companies mc ON mc.company_id = c.id \
             WHERE mc.movie_id = $1 ORDER BY c.id",
        )
        .bind(id)
        .fetch_all(self.db.pool())
        .await?;

        let cast: Vec<CastMember> = sqlx::query_as(
            "SELECT id, movie_id, tmdb_id, name, character, profile_path, credit_order \
             FROM cast_members WHERE movie_id = $1 ORDER BY credit_order ASC, id ASC",
        )
        .bind(id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(Some(MovieDetail {
            movie,
            genres,
            production_companies,
            cast,
        }))
    }

    /// Case-insensitive substring match on the title.
    pub async fn search_by_title(&self, term: &str) -> Result<Vec<Movie>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE title LIKE '%' || $1 || '%' ORDER BY title"
        );
        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(term)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn find_by_genre(&self, genre_id: i64) -> Result<Vec<Movie>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             JOIN movie_genres mg ON mg.movie_id = movies.id \
             WHERE mg.genre_id = $1 ORDER BY movies.id"
        );
        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(genre_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// Movies released in the given calendar year. Rows without a release
    /// date never match.
    pub async fn find_by_year(&self, year: i32) -> Result<Vec<Movie>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE release_date IS NOT NULL \
               AND CAST(strftime('%Y', release_date) AS INTEGER) = $1 \
             ORDER BY release_date"
        );
        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(year)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// Movies with a release date inside the inclusive range.
    pub async fn find_by_date_range(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<Movie>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE release_date IS NOT NULL AND release_date BETWEEN $1 AND $2 \
             ORDER BY release_date"
        );
        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }
}
