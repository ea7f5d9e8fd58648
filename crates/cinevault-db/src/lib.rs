//! Cinevault Database Layer
//!
//! This crate provides an embedded database layer using SQLite for
//! zero-dependency storage of movies, genres, production companies and
//! cast members.
//!
//! # Features
//!
//! - Embedded SQLite (no external server required)
//! - Schema created on startup, safe to re-run
//! - One repository per entity over a shared connection pool
//!
//! # Example
//!
//! ```rust,no_run
//! use cinevault_db::{Database, MovieRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open database
//!     let db = Database::connect("sqlite://data/cinevault.db", 10).await?;
//!     db.migrate().await?;
//!
//!     // Use repositories
//!     let movies = MovieRepository::new(db.clone());
//!     let count = movies.count().await?;
//!     println!("{count} movies");
//!
//!     Ok(())
//! }
//! ```

pub mod cast;
pub mod companies;
pub mod database;
pub mod genres;
pub mod movies;
pub mod schema;

pub use cast::CastRepository;
pub use companies::CompanyRepository;
pub use database::Database;
pub use genres::GenreRepository;
pub use movies::MovieRepository;
pub use schema::{
    CastMember, Genre, Movie, MovieDetail, MovieUpdate, NewCastMember, NewCompany, NewMovie,
    ProductionCompany,
};
