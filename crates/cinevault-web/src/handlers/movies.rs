//! Movie endpoints: paged listing, detail with relationships, filtered
//! finders, and manual create/update/delete for catalog curation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use cinevault_common::ApiError;
use cinevault_db::schema::{MovieUpdate, NewMovie};
use cinevault_db::MovieRepository;

use crate::state::SharedState;

use super::{clamp_page, Paged};

#[derive(Debug, Deserialize)]
pub struct ListMoviesParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
}

fn default_size() -> i64 {
    20
}
fn default_sort_by() -> String {
    "id".to_string()
}
fn default_sort_direction() -> String {
    "asc".to_string()
}

pub async fn list_movies(
    State(state): State<SharedState>,
    Query(params): Query<ListMoviesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, size) = clamp_page(params.page, params.size);
    let repo = MovieRepository::new(state.db.clone());
    let movies = repo
        .list(page, size, &params.sort_by, &params.sort_direction)
        .await?;
    let total = repo.count().await?;
    Ok(Json(Paged::new(movies, page, size, total)))
}

pub async fn get_movie(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = MovieRepository::new(state.db.clone())
        .find_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No movie found with id: {id}")))?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub title: String,
}

pub async fn search_movies(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = MovieRepository::new(state.db.clone())
        .search_by_title(&params.title)
        .await?;
    Ok(Json(movies))
}

pub async fn movies_by_genre(
    State(state): State<SharedState>,
    Path(genre_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = MovieRepository::new(state.db.clone())
        .find_by_genre(genre_id)
        .await?;
    Ok(Json(movies))
}

pub async fn movies_by_year(
    State(state): State<SharedState>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = MovieRepository::new(state.db.clone()).find_by_year(year).await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: String,
    pub end_date: String,
}

pub async fn movies_by_date_range(
    State(state): State<SharedState>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, ApiError> {
    let start = parse_date(&params.start_date)?;
    let end = parse_date(&params.end_date)?;
    if start > end {
        return Err(ApiError::BadRequest(format!(
            "start_date {start} is after end_date {end}"
        )));
    }
    let movies = MovieRepository::new(state.db.clone())
        .find_by_date_range(start, end)
        .await?;
    Ok(Json(movies))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date: {raw} (expected YYYY-MM-DD)")))
}

/// Body for manual create and update. `tmdb_id` is required on create and
/// ignored on update, where identity comes from the path.
#[derive(Debug, Deserialize)]
pub struct MovieUpsertRequest {
    pub tmdb_id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub trailer_key: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl MovieUpsertRequest {
    fn into_new_movie(self) -> NewMovie {
        NewMovie {
            tmdb_id: self.tmdb_id,
            title: self.title,
            overview: self.overview,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            release_date: self.release_date,
            runtime: self.runtime,
            status: self.status,
            popularity: self.popularity,
            original_language: self.original_language,
            original_title: self.original_title,
            adult: self.adult,
            trailer_key: self.trailer_key,
            keywords: self.keywords,
            genre_ids: self.genre_ids,
            companies: Vec::new(),
            cast: Vec::new(),
        }
    }

    fn into_update(self) -> MovieUpdate {
        MovieUpdate {
            title: self.title,
            overview: self.overview,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            release_date: self.release_date,
            runtime: self.runtime,
            status: self.status,
            popularity: self.popularity,
            original_language: self.original_language,
            original_title: self.original_title,
            adult: self.adult,
            trailer_key: self.trailer_key,
            keywords: self.keywords,
            genre_ids: self.genre_ids,
        }
    }
}

pub async fn create_movie(
    State(state): State<SharedState>,
    Json(request): Json<MovieUpsertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".into()));
    }

    let repo = MovieRepository::new(state.db.clone());
    if repo.exists_by_tmdb_id(request.tmdb_id).await? {
        return Err(ApiError::Conflict(format!(
            "movie with tmdb id {} already exists",
            request.tmdb_id
        )));
    }

    let id = repo.insert_with_relations(&request.into_new_movie()).await?;
    let detail = repo
        .find_detail(id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("movie {id} not readable after insert")))?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn update_movie(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(request): Json<MovieUpsertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".into()));
    }

    let repo = MovieRepository::new(state.db.clone());
    if !repo.update(id, &request.into_update()).await? {
        return Err(ApiError::NotFound(format!("No movie found with id: {id}")));
    }
    let detail = repo
        .find_detail(id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("movie {id} not readable after update")))?;
    Ok(Json(detail))
}

pub async fn delete_movie(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if MovieRepository::new(state.db.clone()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("No movie found with id: {id}")))
    }
}
