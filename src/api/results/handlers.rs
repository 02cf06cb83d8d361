use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::api::pagination::{clamp_page, PaginatedResponse};
use crate::core::state::AppState;
use crate::db::models::QuizResult;
use crate::repositories;
use crate::schemas::result::{ResultResponse, StudentAnswerResponse};
use crate::services::access::{resolve_capability, Identity};
use crate::services::QuizError;

#[derive(Debug, Deserialize)]
pub(super) struct ListResultsQuery {
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(super) limit: i64,
    #[serde(default)]
    #[serde(alias = "quizId")]
    pub(super) quiz_id: Option<i64>,
    #[serde(default)]
    #[serde(alias = "groupId")]
    pub(super) group_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MyResultsQuery {
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(super) limit: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct MyAnswersQuery {
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(super) limit: i64,
    #[serde(default)]
    #[serde(alias = "quizId")]
    pub(super) quiz_id: Option<i64>,
}

/// Management view. Admins see every result; everyone else only results
/// recorded under their own teacher id.
pub(super) async fn list_results(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Query(params): Query<ListResultsQuery>,
) -> Result<Json<PaginatedResponse<ResultResponse>>, ApiError> {
    require_permission(&identity, "read:result")?;

    let (skip, limit) = clamp_page(params.skip, params.limit);
    let filter = repositories::results::ResultFilter {
        teacher_id: if identity.is_admin() { None } else { Some(identity.user_id) },
        quiz_id: params.quiz_id,
        group_id: params.group_id,
    };

    let results = repositories::results::list(state.db(), filter, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    let total_count = repositories::results::count(state.db(), filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count results"))?;

    Ok(Json(PaginatedResponse {
        items: results.into_iter().map(ResultResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(super) async fn my_results(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Query(params): Query<MyResultsQuery>,
) -> Result<Json<PaginatedResponse<ResultResponse>>, ApiError> {
    require_permission(&identity, "read:result")?;

    let (skip, limit) = clamp_page(params.skip, params.limit);

    let results = repositories::results::list_for_student(state.db(), identity.user_id, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    let total_count = repositories::results::count_for_student(state.db(), identity.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count results"))?;

    Ok(Json(PaginatedResponse {
        items: results.into_iter().map(ResultResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(super) async fn my_answers(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Query(params): Query<MyAnswersQuery>,
) -> Result<Json<PaginatedResponse<StudentAnswerResponse>>, ApiError> {
    require_permission(&identity, "read:result")?;

    let (skip, limit) = clamp_page(params.skip, params.limit);

    let answers = repositories::answers::list_for_student(
        state.db(),
        identity.user_id,
        params.quiz_id,
        skip,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list answers"))?;
    let total_count =
        repositories::answers::count_for_student(state.db(), identity.user_id, params.quiz_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count answers"))?;

    Ok(Json(PaginatedResponse {
        items: answers.into_iter().map(StudentAnswerResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

async fn load_managed_result(
    state: &AppState,
    identity: &Identity,
    result_id: i64,
) -> Result<QuizResult, ApiError> {
    let result = repositories::results::find_by_id(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?;
    let Some(result) = result else {
        return Err(QuizError::ResultNotFound.into());
    };

    if !resolve_capability(identity, result.teacher_id, Some(result.group_id)).can_manage() {
        return Err(QuizError::AccessDenied.into());
    }

    Ok(result)
}

pub(super) async fn get_result(
    Path(result_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Json<ResultResponse>, ApiError> {
    require_permission(&identity, "read:result")?;

    let result = load_managed_result(&state, &identity, result_id).await?;
    Ok(Json(ResultResponse::from(result)))
}

pub(super) async fn delete_result(
    Path(result_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, "delete:result")?;

    let result = load_managed_result(&state, &identity, result_id).await?;

    repositories::results::delete_by_id(state.db(), result.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete result"))?;

    tracing::info!(result_id = result.id, actor_id = identity.user_id, "Result deleted");

    Ok(StatusCode::NO_CONTENT)
}
