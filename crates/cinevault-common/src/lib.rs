//! cinevault-common — Shared error types for the cinevault crates.

pub mod error;

pub use error::{ApiError, CinevaultError, Result};
