use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::api::pagination::{clamp_page, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::quiz::QuizResponse;
use crate::services::access::resolve_capability;
use crate::services::QuizError;

use super::super::helpers;

#[derive(Debug, Deserialize)]
pub(in crate::api::quizzes) struct ListQuizzesQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    limit: i64,
    #[serde(default)]
    #[serde(alias = "groupId")]
    group_id: Option<i64>,
}

pub(in crate::api::quizzes) async fn list_quizzes(
    CurrentIdentity(identity): CurrentIdentity,
    state: axum::extract::State<AppState>,
    Query(params): Query<ListQuizzesQuery>,
) -> Result<Json<PaginatedResponse<QuizResponse>>, ApiError> {
    require_permission(&identity, "read:quiz")?;

    let (skip, limit) = clamp_page(params.skip, params.limit);
    let filter = repositories::quizzes::QuizFilter {
        teacher_id: if identity.is_admin() { None } else { Some(identity.user_id) },
        group_id: params.group_id,
    };

    let quizzes = repositories::quizzes::list(state.db(), filter, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;
    let total_count = repositories::quizzes::count(state.db(), filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count quizzes"))?;

    let now = primitive_now_utc();
    Ok(Json(PaginatedResponse {
        items: quizzes.into_iter().map(|quiz| helpers::quiz_to_response(quiz, now)).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(in crate::api::quizzes) async fn get_quiz(
    Path(quiz_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    state: axum::extract::State<AppState>,
) -> Result<Json<QuizResponse>, ApiError> {
    require_permission(&identity, "read:quiz")?;

    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;
    let Some(quiz) = quiz else {
        return Err(QuizError::QuizNotFound.into());
    };

    if !resolve_capability(&identity, quiz.teacher_id, Some(quiz.group_id)).can_manage() {
        return Err(QuizError::AccessDenied.into());
    }

    Ok(Json(helpers::quiz_to_response(quiz, primitive_now_utc())))
}
