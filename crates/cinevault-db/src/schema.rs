//! Persisted entity types and insert payloads.
//!
//! `Movie` ids are local autoincrement keys; `tmdb_id` is the upstream
//! identity and is unique. Genres and production companies keep their
//! upstream ids as primary keys, since the catalog never mints its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A catalog movie as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i64>,
    pub status: Option<String>,
    pub popularity: f64,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub adult: bool,
    pub trailer_key: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CastMember {
    pub id: i64,
    pub movie_id: i64,
    pub tmdb_id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub credit_order: i64,
}

/// A movie together with its resolved relationships.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub production_companies: Vec<ProductionCompany>,
    pub cast: Vec<CastMember>,
}

/// Fully-assembled insert payload: the movie row plus everything saved in
/// the same transaction.
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i64>,
    pub status: Option<String>,
    pub popularity: f64,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub adult: bool,
    pub trailer_key: Option<String>,
    pub keywords: Vec<String>,
    /// Resolved genre ids; unknown ids were already dropped upstream.
    pub genre_ids: Vec<i64>,
    pub companies: Vec<NewCompany>,
    pub cast: Vec<NewCastMember>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub tmdb_id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCastMember {
    pub tmdb_id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub credit_order: i64,
}

/// Field overwrite for an existing movie. `tmdb_id` is immutable; genre
/// edges are replaced wholesale with `genre_ids`.
#[derive(Debug, Clone)]
pub struct MovieUpdate {
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i64>,
    pub status: Option<String>,
    pub popularity: f64,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub adult: bool,
    pub trailer_key: Option<String>,
    pub keywords: Vec<String>,
    pub genre_ids: Vec<i64>,
}
