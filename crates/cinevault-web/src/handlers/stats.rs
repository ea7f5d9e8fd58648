//! Catalog statistics.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use cinevault_common::ApiError;
use cinevault_db::{CastRepository, CompanyRepository, GenreRepository, MovieRepository};

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub movies: i64,
    pub genres: i64,
    pub production_companies: i64,
    pub cast_members: i64,
}

pub async fn stats(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let movies = MovieRepository::new(state.db.clone()).count().await?;
    let genres = GenreRepository::new(state.db.clone()).count().await?;
    let production_companies = CompanyRepository::new(state.db.clone()).count().await?;
    let cast_members = CastRepository::new(state.db.clone()).count().await?;

    Ok(Json(StatsResponse {
        movies,
        genres,
        production_companies,
        cast_members,
    }))
}
