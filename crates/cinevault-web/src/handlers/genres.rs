//! Genre endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use cinevault_common::ApiError;
use cinevault_db::GenreRepository;

use crate::state::SharedState;

pub async fn list_genres(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let genres = GenreRepository::new(state.db.clone()).all().await?;
    Ok(Json(genres))
}

pub async fn get_genre(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let genre = GenreRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No genre found with id: {id}")))?;
    Ok(Json(genre))
}
