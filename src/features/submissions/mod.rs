//! Multi-step report submission wizard
//!
//! Accumulates partial user input across HTTP round-trips in the session
//! store, holds the uploaded photo outside permanent storage, and commits
//! the whole draft atomically at the end.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{CommitEngine, CommitService, DraftService};
