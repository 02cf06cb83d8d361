use axum::extract::{Path, State};
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::attempt::{StartAttemptRequest, StartAttemptResponse};
use crate::services::{access, QuizError};

use super::helpers;

pub(in crate::api::attempts) async fn start_attempt(
    Path(quiz_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<StartAttemptRequest>,
) -> Result<Json<StartAttemptResponse>, ApiError> {
    require_permission(&identity, "read:attempt")?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;
    let Some(quiz) = quiz else {
        return Err(QuizError::QuizNotFound.into());
    };

    let now = primitive_now_utc();
    access::authorize_attempt(&quiz, &identity, payload.group_id, Some(&payload.pin), now)?;

    let pool = repositories::assignments::questions_for_quiz(state.db(), quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question pool"))?;
    if pool.is_empty() {
        return Err(QuizError::EmptyPool.into());
    }

    // Fresh shuffle on every call; repeating the view never fixes positions.
    let mut rng = StdRng::from_entropy();
    let questions =
        pool.iter().map(|question| helpers::attempt_question(question, &mut rng)).collect();

    metrics::counter!("quiz_attempts_started_total").increment(1);
    tracing::info!(quiz_id = quiz.id, student_id = identity.user_id, "Attempt started");

    Ok(Json(StartAttemptResponse { quiz: helpers::quiz_summary(&quiz, now), questions }))
}
