mod handlers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_question).get(handlers::list_questions))
        .route("/bulk", post(handlers::bulk_create_questions))
        .route(
            "/:question_id",
            get(handlers::get_question)
                .patch(handlers::update_question)
                .delete(handlers::delete_question),
        )
}
