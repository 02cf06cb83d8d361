use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::QuizError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

/// Domain errors carry their status mapping: lookups are 404, access and
/// PIN failures are 403, lifecycle-phase violations are 405, payload and
/// schedule issues are 400, duplicates are 409.
impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::QuizNotFound | QuizError::QuestionNotFound | QuizError::ResultNotFound => {
                ApiError::NotFound(err.to_string())
            }
            QuizError::AccessDenied => ApiError::Forbidden("Access denied"),
            QuizError::WrongPin => ApiError::Forbidden("Invalid quiz PIN"),
            QuizError::NotActivated | QuizError::NotStarted | QuizError::Finished => {
                ApiError::MethodNotAllowed(err.to_string())
            }
            QuizError::InvalidSchedule(_)
            | QuizError::InsufficientQuestionPool { .. }
            | QuizError::EmptyPool
            | QuizError::EmptySubmission
            | QuizError::DuplicateAnswer(_)
            | QuizError::UnknownQuestion(_) => ApiError::BadRequest(err.to_string()),
            QuizError::DuplicateSubmission
            | QuizError::QuestionReferenced
            | QuizError::PoolAlreadyAssigned => ApiError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let status = StatusCode::UNAUTHORIZED;
                let mut response = (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => {
                let status = StatusCode::FORBIDDEN;
                (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::MethodNotAllowed(message) => {
                let status = StatusCode::METHOD_NOT_ALLOWED;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::Conflict(message) => {
                let status = StatusCode::CONFLICT;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
        }
    }
}
