pub mod health;
pub mod index;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::screening::handlers as candidates;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes as usize + MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_handler))
        // Job postings
        .route(
            "/api/v1/job",
            get(jobs::handle_get_job).post(jobs::handle_post_job),
        )
        // Candidates
        .route(
            "/api/v1/candidates",
            get(candidates::handle_list).delete(candidates::handle_delete_all),
        )
        .route("/api/v1/candidates/screen", post(candidates::handle_screen))
        .route("/api/v1/candidates/stats", get(candidates::handle_stats))
        .route("/api/v1/candidates/export", get(candidates::handle_export))
        .route(
            "/api/v1/candidates/by-name/:name",
            get(candidates::handle_get_candidate),
        )
        .layer(body_limit)
        .with_state(state)
}
