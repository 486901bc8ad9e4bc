use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::features::submissions::dtos::MAX_PHOTO_BYTES;
use crate::features::submissions::handlers::{self, WizardState};
use crate::features::submissions::services::{CommitEngine, DraftService};
use crate::features::tags::services::TagService;

/// Create routes for the submission wizard (authentication is applied by the
/// caller's route layer)
pub fn routes(
    drafts: Arc<DraftService>,
    tags: Arc<TagService>,
    commit: Arc<dyn CommitEngine>,
) -> Router {
    let state = WizardState {
        drafts,
        tags,
        commit,
    };

    Router::new()
        .route(
            "/api/submissions/wizard/step1",
            get(handlers::step1_form)
                .post(handlers::step1_submit)
                // Allow body size up to MAX_PHOTO_BYTES + buffer for multipart
                // overhead; oversized photos inside the limit get a field error
                .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES + 1024 * 1024)),
        )
        .route(
            "/api/submissions/wizard/step2",
            get(handlers::step2_form).post(handlers::step2_submit),
        )
        .route(
            "/api/submissions/wizard/step3",
            get(handlers::step3_form).post(handlers::step3_submit),
        )
        .route("/api/submissions/wizard/done", get(handlers::done))
        .with_state(state)
}
