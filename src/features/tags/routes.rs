use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::tags::handlers::list_tags;
use crate::features::tags::services::TagService;

/// Create routes for the tags feature (public, read-only vocabulary)
pub fn routes(tag_service: Arc<TagService>) -> Router {
    Router::new()
        .route("/api/tags", get(list_tags))
        .with_state(tag_service)
}
