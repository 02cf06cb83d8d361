use rand::Rng;
use time::PrimitiveDateTime;

use crate::api::errors::ApiError;
use crate::db::models::Quiz;
use crate::repositories;
use crate::schemas::quiz::{format_primitive, QuizResponse};
use crate::services::{sampler, schedule, QuizError};

/// Samples the question pool for a freshly created quiz and freezes it.
/// Runs inside the quiz-creation transaction; a quiz that already has
/// assignments is rejected so the pool can never double.
pub(super) async fn assign_pool(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    quiz: &Quiz,
    rng: &mut impl Rng,
) -> Result<Vec<i64>, ApiError> {
    let assigned = repositories::assignments::count_for_quiz(&mut **tx, quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check quiz assignments"))?;
    if assigned > 0 {
        return Err(QuizError::PoolAlreadyAssigned.into());
    }

    let available = repositories::questions::ids_for_teacher_subject(
        &mut **tx,
        quiz.teacher_id,
        quiz.subject_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load question pool"))?;

    let sampled = sampler::sample_question_ids(&available, quiz.question_count, rng)?;

    repositories::assignments::insert_for_quiz(&mut **tx, quiz.id, &sampled)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to assign questions"))?;

    Ok(sampled)
}

pub(super) fn quiz_to_response(quiz: Quiz, now: PrimitiveDateTime) -> QuizResponse {
    let end_time = schedule::end_time(quiz.start_time, quiz.duration_minutes);
    let status = schedule::quiz_phase(&quiz, now).as_str().to_string();

    QuizResponse {
        id: quiz.id,
        name: quiz.name,
        teacher_id: quiz.teacher_id,
        group_id: quiz.group_id,
        subject_id: quiz.subject_id,
        question_count: quiz.question_count,
        duration_minutes: quiz.duration_minutes,
        start_time: format_primitive(quiz.start_time),
        end_time: format_primitive(end_time),
        status,
        pin: quiz.pin,
        is_activated: quiz.is_activated,
        created_at: format_primitive(quiz.created_at),
        updated_at: format_primitive(quiz.updated_at),
    }
}
