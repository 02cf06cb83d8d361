mod handlers;
mod helpers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_quiz).get(handlers::list_quizzes))
        .route(
            "/:quiz_id",
            get(handlers::get_quiz).patch(handlers::update_quiz).delete(handlers::delete_quiz),
        )
        .route("/:quiz_id/activation", post(handlers::set_quiz_activation))
}
