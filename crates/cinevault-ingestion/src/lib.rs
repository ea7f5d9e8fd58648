//! cinevault-ingestion — Bounded movie ingestion pipeline.
//! Covers the full path from the remote catalog into the database:
//! - Genre seeding
//! - Popularity-ordered page scanning
//! - Duplicate and adult-content gating
//! - Detail retrieval with retries
//! - Relationship assembly
//! - Atomic persistence
//! - Pacing, cooldowns and progress events

pub mod assemble;
pub mod dedup;
pub mod models;
pub mod pacing;
pub mod pipeline;
pub mod store;
pub mod tmdb;
