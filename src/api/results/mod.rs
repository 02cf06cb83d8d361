mod handlers;

use axum::{routing::get, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_results))
        .route("/my", get(handlers::my_results))
        .route("/my/answers", get(handlers::my_answers))
        .route("/:result_id", get(handlers::get_result).delete(handlers::delete_result))
}

#[cfg(test)]
mod tests;
