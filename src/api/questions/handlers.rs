use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::api::pagination::{clamp_page, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::question::{
    QuestionBulkCreate, QuestionCreate, QuestionResponse, QuestionUpdate,
};
use crate::services::access::resolve_capability;
use crate::services::QuizError;

#[derive(Debug, Deserialize)]
pub(super) struct ListQuestionsQuery {
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(super) limit: i64,
    #[serde(default)]
    #[serde(alias = "subjectId")]
    pub(super) subject_id: Option<i64>,
}

fn ensure_question_content(
    text: Option<&str>,
    image: Option<&str>,
    option_a: Option<&str>,
    option_a_image: Option<&str>,
) -> Result<(), ApiError> {
    let has_prompt = text.is_some_and(|value| !value.trim().is_empty())
        || image.is_some_and(|value| !value.trim().is_empty());
    if !has_prompt {
        return Err(ApiError::BadRequest("Question text or image is required".to_string()));
    }

    let has_answer = option_a.is_some_and(|value| !value.trim().is_empty())
        || option_a_image.is_some_and(|value| !value.trim().is_empty());
    if !has_answer {
        return Err(ApiError::BadRequest(
            "Correct answer (option_a or option_a_image) is required".to_string(),
        ));
    }

    Ok(())
}

pub(super) async fn create_question(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    require_permission(&identity, "create:question")?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    ensure_question_content(
        payload.text.as_deref(),
        payload.image.as_deref(),
        payload.option_a.as_deref(),
        payload.option_a_image.as_deref(),
    )?;

    let now = primitive_now_utc();
    let question = repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            subject_id: payload.subject_id,
            teacher_id: identity.user_id,
            text: payload.text.as_deref(),
            image: payload.image.as_deref(),
            option_a: payload.option_a.as_deref(),
            option_a_image: payload.option_a_image.as_deref(),
            option_b: payload.option_b.as_deref(),
            option_b_image: payload.option_b_image.as_deref(),
            option_c: payload.option_c.as_deref(),
            option_c_image: payload.option_c_image.as_deref(),
            option_d: payload.option_d.as_deref(),
            option_d_image: payload.option_d_image.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    tracing::info!(
        question_id = question.id,
        teacher_id = identity.user_id,
        subject_id = question.subject_id,
        "Question created"
    );

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))))
}

pub(super) async fn bulk_create_questions(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<QuestionBulkCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    require_permission(&identity, "create:question")?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    for (position, row) in payload.questions.iter().enumerate() {
        let index = position + 1;
        if row.text.trim().is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Row {index} is invalid: 'text' column is empty"
            )));
        }
        if row.option_a.trim().is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Row {index} is invalid: 'option_a' column is empty"
            )));
        }
    }

    let now = primitive_now_utc();
    let rows: Vec<repositories::questions::CreateQuestion<'_>> = payload
        .questions
        .iter()
        .map(|row| repositories::questions::CreateQuestion {
            subject_id: payload.subject_id,
            teacher_id: identity.user_id,
            text: Some(row.text.as_str()),
            image: None,
            option_a: Some(row.option_a.as_str()),
            option_a_image: None,
            option_b: row.option_b.as_deref(),
            option_b_image: None,
            option_c: row.option_c.as_deref(),
            option_c_image: None,
            option_d: row.option_d.as_deref(),
            option_d_image: None,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let created = repositories::questions::create_many(state.db(), &rows)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to import questions"))?;

    tracing::info!(
        created,
        subject_id = payload.subject_id,
        teacher_id = identity.user_id,
        "Questions imported"
    );

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "created": created }))))
}

pub(super) async fn list_questions(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Query(params): Query<ListQuestionsQuery>,
) -> Result<Json<PaginatedResponse<QuestionResponse>>, ApiError> {
    require_permission(&identity, "read:question")?;

    let (skip, limit) = clamp_page(params.skip, params.limit);
    let filter = repositories::questions::QuestionFilter {
        teacher_id: if identity.is_admin() { None } else { Some(identity.user_id) },
        subject_id: params.subject_id,
    };

    let questions = repositories::questions::list(state.db(), filter, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    let total_count = repositories::questions::count(state.db(), filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;

    Ok(Json(PaginatedResponse {
        items: questions.into_iter().map(QuestionResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(super) async fn get_question(
    Path(question_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Json<QuestionResponse>, ApiError> {
    require_permission(&identity, "read:question")?;

    let question = repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?;
    let Some(question) = question else {
        return Err(QuizError::QuestionNotFound.into());
    };

    if !resolve_capability(&identity, question.teacher_id, None).can_manage() {
        return Err(QuizError::AccessDenied.into());
    }

    Ok(Json(QuestionResponse::from(question)))
}

pub(super) async fn update_question(
    Path(question_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<QuestionResponse>, ApiError> {
    require_permission(&identity, "update:question")?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let question = repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?;
    let Some(question) = question else {
        return Err(QuizError::QuestionNotFound.into());
    };

    if !resolve_capability(&identity, question.teacher_id, None).can_manage() {
        return Err(QuizError::AccessDenied.into());
    }

    let referencing = repositories::assignments::count_for_question(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check question references"))?;
    if referencing > 0 {
        return Err(QuizError::QuestionReferenced.into());
    }

    let updated = repositories::questions::update(
        state.db(),
        question_id,
        repositories::questions::UpdateQuestion {
            text: payload.text,
            image: payload.image,
            option_a: payload.option_a,
            option_a_image: payload.option_a_image,
            option_b: payload.option_b,
            option_b_image: payload.option_b_image,
            option_c: payload.option_c,
            option_c_image: payload.option_c_image,
            option_d: payload.option_d,
            option_d_image: payload.option_d_image,
        },
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?;

    Ok(Json(QuestionResponse::from(updated)))
}

pub(super) async fn delete_question(
    Path(question_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, "delete:question")?;

    let question = repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?;
    let Some(question) = question else {
        return Err(QuizError::QuestionNotFound.into());
    };

    if !resolve_capability(&identity, question.teacher_id, None).can_manage() {
        return Err(QuizError::AccessDenied.into());
    }

    let referencing = repositories::assignments::count_for_question(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check question references"))?;
    if referencing > 0 {
        return Err(QuizError::QuestionReferenced.into());
    }

    repositories::questions::delete_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    tracing::info!(question_id, teacher_id = identity.user_id, "Question deleted");

    Ok(StatusCode::NO_CONTENT)
}
