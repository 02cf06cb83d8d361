use std::collections::{HashMap, HashSet};

use axum::extract::{Path, State};
use axum::Json;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_permission, CurrentIdentity};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Question;
use crate::repositories;
use crate::schemas::attempt::{AttemptResultResponse, SubmitAttemptRequest};
use crate::services::{access, grading, QuizError};

pub(in crate::api::attempts) async fn submit_attempt(
    Path(quiz_id): Path<i64>,
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<Json<AttemptResultResponse>, ApiError> {
    require_permission(&identity, "create:attempt")?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if payload.answers.is_empty() {
        return Err(QuizError::EmptySubmission.into());
    }

    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;
    let Some(quiz) = quiz else {
        return Err(QuizError::QuizNotFound.into());
    };

    let now = primitive_now_utc();
    access::authorize_attempt(&quiz, &identity, payload.group_id, None, now)?;

    let pool = repositories::assignments::questions_for_quiz(state.db(), quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question pool"))?;
    if pool.is_empty() {
        return Err(QuizError::EmptyPool.into());
    }
    let pool: HashMap<i64, Question> =
        pool.into_iter().map(|question| (question.id, question)).collect();

    let mut seen = HashSet::new();
    for answer in &payload.answers {
        if !seen.insert(answer.question_id) {
            return Err(QuizError::DuplicateAnswer(answer.question_id).into());
        }
        if !pool.contains_key(&answer.question_id) {
            return Err(QuizError::UnknownQuestion(answer.question_id).into());
        }
    }

    let summary = grading::grade(
        &pool,
        payload.answers.iter().map(|answer| (answer.question_id, answer.option_value.as_str())),
        quiz.question_count,
    );

    let rows: Vec<repositories::answers::CreateAnswer<'_>> = payload
        .answers
        .iter()
        .map(|answer| repositories::answers::CreateAnswer {
            quiz_id: quiz.id,
            student_id: identity.user_id,
            question_id: answer.question_id,
            option_value: answer.option_value.as_str(),
            created_at: now,
        })
        .collect();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    // The UNIQUE (student_id, quiz_id) constraint decides who wins a
    // concurrent double-submit; the loser rolls back without writing answers.
    let result = repositories::results::create(
        &mut *tx,
        repositories::results::CreateResult {
            student_id: identity.user_id,
            teacher_id: quiz.teacher_id,
            group_id: quiz.group_id,
            subject_id: quiz.subject_id,
            quiz_id: quiz.id,
            correct_count: summary.correct,
            incorrect_count: summary.incorrect,
            grade: summary.grade,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record result"))?;
    if result.is_none() {
        return Err(QuizError::DuplicateSubmission.into());
    }

    repositories::answers::insert_many(&mut *tx, &rows)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to record answers"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    metrics::counter!("quiz_attempts_submitted_total", "grade" => summary.grade.to_string())
        .increment(1);
    tracing::info!(
        quiz_id = quiz.id,
        student_id = identity.user_id,
        correct = summary.correct,
        grade = summary.grade,
        "Attempt graded"
    );

    Ok(Json(AttemptResultResponse {
        quiz_id: quiz.id,
        total_answered: summary.total_answered,
        correct_answers: summary.correct,
        incorrect_answers: summary.incorrect,
        percentage: summary.percentage,
        grade: summary.grade,
    }))
}
