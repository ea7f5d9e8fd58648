//! Production company endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use cinevault_common::ApiError;
use cinevault_db::CompanyRepository;

use crate::state::SharedState;

use super::{clamp_page, PageParams, Paged};

pub async fn list_companies(
    State(state): State<SharedState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, size) = clamp_page(params.page, params.size);
    let repo = CompanyRepository::new(state.db.clone());
    let companies = repo.list(page, size).await?;
    let total = repo.count().await?;
    Ok(Json(Paged::new(companies, page, size, total)))
}

pub async fn get_company(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let company = CompanyRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No production company found with id: {id}")))?;
    Ok(Json(company))
}
