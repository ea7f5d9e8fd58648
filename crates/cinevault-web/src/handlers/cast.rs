//! Cast member endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use cinevault_common::ApiError;
use cinevault_db::{CastRepository, MovieRepository};

use crate::state::SharedState;

use super::{clamp_page, PageParams, Paged};

pub async fn list_cast(
    State(state): State<SharedState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, size) = clamp_page(params.page, params.size);
    let repo = CastRepository::new(state.db.clone());
    let members = repo.list(page, size).await?;
    let total = repo.count().await?;
    Ok(Json(Paged::new(members, page, size, total)))
}

pub async fn get_cast_member(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let member = CastRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No cast member found with id: {id}")))?;
    Ok(Json(member))
}

/// A movie's billed cast in credit order; 404 when the movie is unknown.
pub async fn cast_by_movie(
    State(state): State<SharedState>,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = MovieRepository::new(state.db.clone());
    if movies.find_by_id(movie_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("No movie found with id: {movie_id}")));
    }

    let cast = CastRepository::new(state.db.clone())
        .find_by_movie(movie_id)
        .await?;
    Ok(Json(cast))
}
