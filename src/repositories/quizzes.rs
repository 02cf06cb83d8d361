use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Quiz;

pub(crate) const COLUMNS: &str = "\
    id, name, teacher_id, group_id, subject_id, question_count, \
    duration_minutes, start_time, pin, is_activated, created_at, updated_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) name: &'a str,
    pub(crate) teacher_id: i64,
    pub(crate) group_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) question_count: i32,
    pub(crate) duration_minutes: i32,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) pin: &'a str,
    pub(crate) is_activated: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Partial update. Ownership, group, subject and question_count are fixed at
/// creation; only scheduling fields and presentation fields move.
#[derive(Debug, Default)]
pub(crate) struct UpdateQuiz {
    pub(crate) name: Option<String>,
    pub(crate) pin: Option<String>,
    pub(crate) start_time: Option<PrimitiveDateTime>,
    pub(crate) duration_minutes: Option<i32>,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct QuizFilter {
    pub(crate) teacher_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    quiz: CreateQuiz<'_>,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (
            name, teacher_id, group_id, subject_id, question_count,
            duration_minutes, start_time, pin, is_activated, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        RETURNING {COLUMNS}"
    ))
    .bind(quiz.name)
    .bind(quiz.teacher_id)
    .bind(quiz.group_id)
    .bind(quiz.subject_id)
    .bind(quiz.question_count)
    .bind(quiz.duration_minutes)
    .bind(quiz.start_time)
    .bind(quiz.pin)
    .bind(quiz.is_activated)
    .bind(quiz.created_at)
    .bind(quiz.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: QuizFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<Quiz>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM quizzes"));
    push_filter(&mut builder, filter);

    builder.push(" ORDER BY start_time DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<Quiz>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, filter: QuizFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM quizzes");
    push_filter(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: QuizFilter) {
    let mut has_where = false;

    if let Some(teacher_id) = filter.teacher_id {
        if !has_where {
            builder.push(" WHERE ");
            has_where = true;
        } else {
            builder.push(" AND ");
        }
        builder.push("teacher_id = ");
        builder.push_bind(teacher_id);
    }
    if let Some(group_id) = filter.group_id {
        if !has_where {
            builder.push(" WHERE ");
        } else {
            builder.push(" AND ");
        }
        builder.push("group_id = ");
        builder.push_bind(group_id);
    }
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    update: UpdateQuiz,
    updated_at: PrimitiveDateTime,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes SET
            name = COALESCE($2, name),
            pin = COALESCE($3, pin),
            start_time = COALESCE($4, start_time),
            duration_minutes = COALESCE($5, duration_minutes),
            updated_at = $6
        WHERE id = $1
        RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(update.name)
    .bind(update.pin)
    .bind(update.start_time)
    .bind(update.duration_minutes)
    .bind(updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_activation(
    pool: &PgPool,
    id: i64,
    active: bool,
    updated_at: PrimitiveDateTime,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes SET is_activated = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(active)
    .bind(updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
