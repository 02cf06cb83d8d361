mod helpers;
mod start;
mod submit;

use axum::{routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:quiz_id/start", post(start::start_attempt))
        .route("/:quiz_id/submit", post(submit::submit_attempt))
}
