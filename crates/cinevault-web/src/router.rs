//! URL surface of the catalog API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{cast, companies, genres, ingest, movies, stats};
use crate::sse::event_stream;
use crate::state::{AppState, SharedState};

/// Build the router with every route and middleware layer attached.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Movies
        .route(
            "/api/movies",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route("/api/movies/search", get(movies::search_movies))
        .route("/api/movies/date-range", get(movies::movies_by_date_range))
        .route("/api/movies/genre/{genre_id}", get(movies::movies_by_genre))
        .route("/api/movies/year/{year}", get(movies::movies_by_year))
        .route(
            "/api/movies/{id}",
            get(movies::get_movie)
                .put(movies::update_movie)
                .delete(movies::delete_movie),
        )
        // Genres
        .route("/api/genres", get(genres::list_genres))
        .route("/api/genres/{id}", get(genres::get_genre))
        // Cast
        .route("/api/cast", get(cast::list_cast))
        .route("/api/cast/movie/{movie_id}", get(cast::cast_by_movie))
        .route("/api/cast/{id}", get(cast::get_cast_member))
        // Production companies
        .route("/api/companies", get(companies::list_companies))
        .route("/api/companies/{id}", get(companies::get_company))
        // Stats + ingestion
        .route("/api/stats", get(stats::stats))
        .route("/api/ingest/run", post(ingest::run))
        // SSE streaming
        .route("/api/events", get(event_stream))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
