use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, to_primitive_utc};
use crate::repositories;
use crate::schemas::quiz::{QuizCreate, QuizResponse};
use crate::services::schedule;

use super::super::helpers;

pub(in crate::api::quizzes) async fn create_quiz(
    CurrentIdentity(identity): CurrentIdentity,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(axum::http::StatusCode, Json<QuizResponse>), ApiError> {
    require_permission(&identity, "create:quiz")?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let start_time = schedule::validate_start_time(to_primitive_utc(payload.start_time), now)?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let quiz = repositories::quizzes::create(
        &mut *tx,
        repositories::quizzes::CreateQuiz {
            name: &payload.name,
            teacher_id: identity.user_id,
            group_id: payload.group_id,
            subject_id: payload.subject_id,
            question_count: payload.question_count,
            duration_minutes: payload.duration_minutes,
            start_time,
            pin: &payload.pin,
            is_activated: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    let pool = helpers::assign_pool(&mut tx, &quiz, &mut StdRng::from_entropy()).await?;
    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    tracing::info!(
        quiz_id = quiz.id,
        teacher_id = identity.user_id,
        subject_id = quiz.subject_id,
        pool_size = pool.len(),
        "Quiz created"
    );

    Ok((axum::http::StatusCode::CREATED, Json(helpers::quiz_to_response(quiz, now))))
}
