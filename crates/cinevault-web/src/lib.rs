//! cinevault-web — HTTP API over the movie catalog.

pub mod config;
pub mod handlers;
pub mod router;
pub mod sse;
pub mod state;
