use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, to_primitive_utc};
use crate::db::models::Quiz;
use crate::repositories;
use crate::schemas::quiz::{QuizActivation, QuizResponse, QuizUpdate};
use crate::services::access::{resolve_capability, Identity};
use crate::services::{schedule, QuizError};

use super::super::helpers;

async fn load_managed_quiz(
    state: &AppState,
    identity: &Identity,
    quiz_id: i64,
) -> Result<Quiz, ApiError> {
    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;
    let Some(quiz) = quiz else {
        return Err(QuizError::QuizNotFound.into());
    };

    if !resolve_capability(identity, quiz.teacher_id, Some(quiz.group_id)).can_manage() {
        return Err(QuizError::AccessDenied.into());
    }

    Ok(quiz)
}

pub(in crate::api::quizzes) async fn update_quiz(
    Path(quiz_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizResponse>, ApiError> {
    require_permission(&identity, "update:quiz")?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let quiz = load_managed_quiz(&state, &identity, quiz_id).await?;

    let now = primitive_now_utc();
    let start_time = match payload.start_time {
        Some(value) => Some(schedule::validate_start_time(to_primitive_utc(value), now)?),
        None => None,
    };

    let updated = repositories::quizzes::update(
        state.db(),
        quiz.id,
        repositories::quizzes::UpdateQuiz {
            name: payload.name,
            pin: payload.pin,
            start_time,
            duration_minutes: payload.duration_minutes,
        },
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    Ok(Json(helpers::quiz_to_response(updated, now)))
}

pub(in crate::api::quizzes) async fn set_quiz_activation(
    Path(quiz_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizActivation>,
) -> Result<Json<QuizResponse>, ApiError> {
    require_permission(&identity, "update:quiz")?;

    let quiz = load_managed_quiz(&state, &identity, quiz_id).await?;

    let now = primitive_now_utc();
    let updated = repositories::quizzes::set_activation(state.db(), quiz.id, payload.active, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update quiz activation"))?;

    tracing::info!(
        quiz_id = updated.id,
        teacher_id = identity.user_id,
        active = updated.is_activated,
        "Quiz activation changed"
    );

    Ok(Json(helpers::quiz_to_response(updated, now)))
}

pub(in crate::api::quizzes) async fn delete_quiz(
    Path(quiz_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    state: axum::extract::State<AppState>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, "delete:quiz")?;

    let quiz = load_managed_quiz(&state, &identity, quiz_id).await?;

    repositories::quizzes::delete_by_id(state.db(), quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    tracing::info!(quiz_id = quiz.id, teacher_id = identity.user_id, "Quiz deleted");

    Ok(StatusCode::NO_CONTENT)
}
